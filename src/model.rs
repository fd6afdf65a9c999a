use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShorteningStatus {
    Pending,
    Shortened,
    Error,
}

impl ShorteningStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShorteningStatus::Pending => "pending",
            ShorteningStatus::Shortened => "shortened",
            ShorteningStatus::Error => "error",
        }
    }
}

impl FromStr for ShorteningStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ShorteningStatus::Pending),
            "shortened" => Ok(ShorteningStatus::Shortened),
            "error" => Ok(ShorteningStatus::Error),
            other => Err(format!("unknown shortening status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    pub id: i32,
    pub user_id: String,
    pub url: String,
    pub title: String,
    pub tags: Vec<String>,
    pub favicon: Option<String>,
    pub short_url: Option<String>,
    pub rebrandly_id: Option<String>,
    pub shortening_status: Option<ShorteningStatus>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub name: String,
    pub count: i32,
}

#[derive(Debug, Serialize)]
pub struct TagSummary {
    pub tags: Vec<TagCount>,
    pub total_links: i32,
}

#[derive(Debug, Serialize)]
pub struct LinkPage {
    pub links: Vec<Link>,
    pub total: i32,
    pub page: u32,
    pub limit: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortening_status_parses_stored_values() {
        for status in [ShorteningStatus::Pending, ShorteningStatus::Shortened, ShorteningStatus::Error] {
            assert_eq!(status.as_str().parse::<ShorteningStatus>(), Ok(status));
        }
        assert!("Shortened".parse::<ShorteningStatus>().is_err());
        assert!("".parse::<ShorteningStatus>().is_err());
    }
}
