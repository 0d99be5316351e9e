use common::CandidateRecord;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: u64,
}

#[derive(Debug, Deserialize)]
pub struct Listing {
    pub data: ListingData,
}

#[derive(Debug, Deserialize)]
pub struct ListingData {
    #[serde(default)]
    pub children: Vec<Thing>,
    pub after: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Thing {
    pub kind: String,
    pub data: Submission,
}

#[derive(Debug, Deserialize)]
pub struct Submission {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub stickied: bool,
}

impl From<Submission> for CandidateRecord {
    fn from(submission: Submission) -> Self {
        Self {
            id: submission.id,
            title: submission.title,
            url: submission.url,
            score: submission.score,
            stickied: submission.stickied,
        }
    }
}

impl Listing {
    /// Splits the page into its link posts (`t3`) and the cursor for the next page.
    pub fn into_candidates(self) -> (Vec<CandidateRecord>, Option<String>) {
        let candidates = self
            .data
            .children
            .into_iter()
            .filter(|thing| thing.kind == "t3")
            .map(|thing| CandidateRecord::from(thing.data))
            .collect();
        (candidates, self.data.after)
    }
}
