use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularPhoto {
    pub id: String,
    pub title: String,
    pub views: u64,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryShare {
    pub category: String,
    pub count: usize,
    /// Rounded to the nearest whole percent.
    pub percentage: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyUploads {
    /// `YYYY-MM`
    pub month: String,
    pub uploads: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_photos: usize,
    pub total_galleries: usize,
    pub total_categories: usize,
    pub total_views: u64,
    pub recent_uploads: usize,
    pub popular_photos: Vec<PopularPhoto>,
    pub category_breakdown: Vec<CategoryShare>,
    pub monthly_stats: Vec<MonthlyUploads>,
}
