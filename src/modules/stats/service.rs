use chrono::{DateTime, Datelike, Duration, Utc};
use std::sync::Arc;

use crate::api::error;
use crate::modules::category::repository::CategoryRepository;
use crate::modules::gallery::repository::GalleryRepository;
use crate::modules::photo::{repository::PhotoRepository, schema::PhotoEntity};
use crate::modules::stats::model::{CategoryShare, DashboardStats, MonthlyUploads, PopularPhoto};

const RECENT_DAYS: i64 = 7;
const POPULAR_LIMIT: usize = 5;
const MONTHS: u32 = 6;

#[derive(Clone)]
pub struct StatsService {
    photos: Arc<dyn PhotoRepository + Send + Sync>,
    galleries: Arc<dyn GalleryRepository + Send + Sync>,
    categories: Arc<dyn CategoryRepository + Send + Sync>,
}

impl StatsService {
    pub fn new(
        photos: Arc<dyn PhotoRepository + Send + Sync>,
        galleries: Arc<dyn GalleryRepository + Send + Sync>,
        categories: Arc<dyn CategoryRepository + Send + Sync>,
    ) -> Self {
        Self { photos, galleries, categories }
    }

    pub async fn dashboard(&self) -> Result<DashboardStats, error::SystemError> {
        let photos = self.photos.find_all().await?;
        let total_galleries = self.galleries.find_all().await?.len();
        let total_categories = self.categories.find_all().await?.len();
        Ok(compute(&photos, total_galleries, total_categories, Utc::now()))
    }
}

pub fn compute(
    photos: &[PhotoEntity],
    total_galleries: usize,
    total_categories: usize,
    now: DateTime<Utc>,
) -> DashboardStats {
    let total_photos = photos.len();
    let since = now - Duration::days(RECENT_DAYS);

    let mut by_views: Vec<&PhotoEntity> = photos.iter().collect();
    by_views.sort_by(|a, b| b.views.cmp(&a.views));
    let popular_photos = by_views
        .into_iter()
        .take(POPULAR_LIMIT)
        .map(|p| PopularPhoto {
            id: p.id.clone(),
            title: p.title.clone(),
            views: p.views,
            url: p.url.clone(),
        })
        .collect();

    // first-seen order
    let mut counts: Vec<(String, usize)> = Vec::new();
    for photo in photos {
        match counts.iter_mut().find(|(c, _)| *c == photo.category) {
            Some((_, n)) => *n += 1,
            None => counts.push((photo.category.clone(), 1)),
        }
    }
    let category_breakdown = counts
        .into_iter()
        .map(|(category, count)| CategoryShare {
            category,
            count,
            percentage: ((count as f64 / total_photos as f64) * 100.0).round() as u32,
        })
        .collect();

    let monthly_stats = (0..MONTHS)
        .rev()
        .map(|back| {
            let (year, month) = months_before(now.year(), now.month(), back);
            let uploads = photos
                .iter()
                .filter(|p| p.uploaded_at.year() == year && p.uploaded_at.month() == month)
                .count();
            MonthlyUploads { month: format!("{year:04}-{month:02}"), uploads }
        })
        .collect();

    DashboardStats {
        total_photos,
        total_galleries,
        total_categories,
        total_views: photos.iter().map(|p| p.views).sum(),
        recent_uploads: photos.iter().filter(|p| p.uploaded_at > since).count(),
        popular_photos,
        category_breakdown,
        monthly_stats,
    }
}

fn months_before(year: i32, month: u32, back: u32) -> (i32, u32) {
    let index = year * 12 + month as i32 - 1 - back as i32;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}
