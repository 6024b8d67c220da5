//! Posture fixtures

use AsanaBuddy::models::{Posture, Series};

/// Telegram user id used across the flow tests
pub const TEST_USER: i64 = 424242;

/// Helper function to create a test posture
pub fn create_test_posture(id: i64, series: Series, order_num: u32) -> Posture {
    Posture {
        id,
        name: format!("Posture {}", id),
        series,
        order_num,
        image_url: format!("https://cdn.example.com/asanas/{}.png", id),
        transcription: Some(format!("po-sture {}", id)),
        meaning: None,
    }
}

/// A series with consecutive order numbers `1..=count`, ids starting at `first_id`
pub fn create_test_series(series: Series, first_id: i64, count: u32) -> Vec<Posture> {
    (0..count)
        .map(|i| create_test_posture(first_id + i as i64, series, i + 1))
        .collect()
}
