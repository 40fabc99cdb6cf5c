//! Text rendering of controller and connectivity state.

use crate::fetch::FetchStatus;

pub fn status_line(status: &FetchStatus) -> String {
    match status {
        FetchStatus::Idle => "Enter a URL and press Load Image".to_string(),
        FetchStatus::Loading => "Loading...".to_string(),
        FetchStatus::Success(image) => {
            format!("Loaded image {}x{}", image.width(), image.height())
        }
        FetchStatus::Error => "Failed to load image".to_string(),
    }
}

pub fn connectivity_badge(online: bool) -> &'static str {
    if online {
        "Online"
    } else {
        "Offline"
    }
}
