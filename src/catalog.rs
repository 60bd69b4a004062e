use crate::models::{
    AnalyticsReport, ChartPlaceholder, Course, CourseStatus, FacultyMember, RatingBand,
    RecentFeedback, StatCard,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;

/// Catalog Trait
///
/// Read-only source of the sample data the screens display. Handlers only see this trait, so
/// tests can hand them a catalog with exactly the rows they need.
///
/// **Send + Sync + async_trait** are required to share `Arc<dyn Catalog>` across Axum tasks.
#[async_trait]
pub trait Catalog: Send + Sync {
    // --- Feedback form choices ---
    async fn courses(&self) -> Vec<Course>;
    async fn faculty(&self) -> Vec<FacultyMember>;

    // --- Faculty dashboard ---
    async fn faculty_stats(&self) -> Vec<StatCard>;
    async fn recent_feedback(&self) -> Vec<RecentFeedback>;

    async fn analytics(&self) -> AnalyticsReport;
}

/// CatalogState
///
/// The concrete type used to share the catalog across the application state.
pub type CatalogState = Arc<dyn Catalog>;

/// DemoCatalog
///
/// The fixed sample data every screen shows. Nothing here changes at runtime.
#[derive(Debug, Clone, Default)]
pub struct DemoCatalog;

impl DemoCatalog {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Catalog for DemoCatalog {
    async fn courses(&self) -> Vec<Course> {
        vec![
            course(1, "Introduction to React", "Dr. John Smith", CourseStatus::Active),
            course(2, "Advanced JavaScript", "Prof. Sarah Johnson", CourseStatus::Active),
            course(
                3,
                "Web Development Fundamentals",
                "Dr. Michael Brown",
                CourseStatus::Completed,
            ),
        ]
    }

    async fn faculty(&self) -> Vec<FacultyMember> {
        [
            "Dr. John Smith",
            "Prof. Sarah Johnson",
            "Dr. Michael Brown",
            "Prof. Emily Davis",
            "Dr. James Wilson",
            "Prof. Lisa Anderson",
        ]
        .iter()
        .zip(1..)
        .map(|(name, id)| FacultyMember {
            id,
            name: name.to_string(),
        })
        .collect()
    }

    async fn faculty_stats(&self) -> Vec<StatCard> {
        vec![
            stat("Total Students", "1,250"),
            stat("Total Feedback", "3,847"),
            stat("Forms Created", "12"),
            stat("Active Courses", "8"),
        ]
    }

    async fn recent_feedback(&self) -> Vec<RecentFeedback> {
        vec![
            feedback(1, "Alice Johnson", "React Basics", 4.5, date(2026, 2, 20)),
            feedback(2, "Bob Smith", "JavaScript Advanced", 4.0, date(2026, 2, 21)),
            feedback(3, "Charlie Brown", "Web Development", 4.8, date(2026, 2, 22)),
            feedback(4, "Diana Davis", "UI/UX Design", 4.2, date(2026, 2, 22)),
        ]
    }

    async fn analytics(&self) -> AnalyticsReport {
        AnalyticsReport {
            cards: vec![
                stat("Total Responses", "245"),
                stat("Average Rating", "4.5/5"),
                stat("Forms Created", "12"),
                stat("Response Rate", "78%"),
            ],
            charts: ["Rating Distribution", "Response Trends"]
                .iter()
                .map(|title| ChartPlaceholder {
                    title: title.to_string(),
                    note: "Chart placeholder - Ready for implementation".to_string(),
                })
                .collect(),
        }
    }
}

fn course(id: u32, name: &str, instructor: &str, status: CourseStatus) -> Course {
    Course {
        id,
        name: name.to_string(),
        instructor: instructor.to_string(),
        status,
    }
}

fn stat(title: &str, value: &str) -> StatCard {
    StatCard {
        title: title.to_string(),
        value: value.to_string(),
    }
}

fn feedback(id: u32, student: &str, course: &str, rating: f32, date: NaiveDate) -> RecentFeedback {
    RecentFeedback {
        id,
        student: student.to_string(),
        course: course.to_string(),
        rating,
        date,
        band: RatingBand::for_rating(rating),
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}
