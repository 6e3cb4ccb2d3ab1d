//! Wire shapes of the NYT Books API v3 responses.
//!
//! Only the fields the application reads are declared; everything else in
//! the payload is ignored.

use serde::Deserialize;

/// `GET lists/names.json`
#[derive(Debug, Deserialize)]
pub struct ListNamesResponse {
    pub results: Vec<ListName>,
}

#[derive(Debug, Deserialize)]
pub struct ListName {
    pub list_name_encoded: String,
}

/// `GET lists/current/{list}.json`
#[derive(Debug, Deserialize)]
pub struct CurrentListResponse {
    pub results: CurrentList,
}

#[derive(Debug, Deserialize)]
pub struct CurrentList {
    pub books: Vec<ListBook>,
}

#[derive(Debug, Deserialize)]
pub struct ListBook {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub book_image: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub rank: Option<u32>,
}

/// `GET lists/best-sellers/history.json`
#[derive(Debug, Deserialize)]
pub struct HistoryResponse {
    pub results: Vec<HistoryRecord>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryRecord {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub ranks_history: Vec<RankRecord>,
}

#[derive(Debug, Deserialize)]
pub struct RankRecord {
    #[serde(default)]
    pub display_name: Option<String>,
    pub list_name: String,
    pub rank: u32,
    #[serde(default)]
    pub bestsellers_date: Option<String>,
    #[serde(default)]
    pub weeks_on_list: u32,
}
