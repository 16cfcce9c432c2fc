//! Display utilities for the Pomonoise CLI.
//!
//! This module provides formatted output for:
//! - Success messages
//! - Error messages
//! - Status display
//! - The ambient track catalog

use crate::sound::CATALOG;
use crate::types::IpcResponse;

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Shows a success message for timer start.
    pub fn show_start_success(response: &IpcResponse) {
        println!("* タイマーを開始しました");

        if let Some(data) = &response.data {
            if let Some(mode) = data.mode.as_deref() {
                println!("  モード: {}", Self::mode_display(mode));
            }
            if let Some(remaining) = data.remaining_seconds {
                let (minutes, seconds) = Self::format_time(remaining);
                println!("  残り時間: {}:{:02}", minutes, seconds);
            }
            if let Some(sound) = data.sound.as_deref() {
                println!("  音声: {}", Self::sound_display(sound));
            }
        }
    }

    /// Shows a success message for timer stop.
    pub fn show_stop_success(response: &IpcResponse) {
        println!("[] タイマーを停止しました");

        if let Some(data) = &response.data {
            if let Some(remaining) = data.remaining_seconds {
                let (minutes, seconds) = Self::format_time(remaining);
                println!("  リセット後の時間: {}:{:02}", minutes, seconds);
            }
        }
    }

    /// Shows the result of a mode switch.
    pub fn show_mode_success(response: &IpcResponse) {
        if let Some(data) = &response.data {
            if let Some(mode) = data.mode.as_deref() {
                println!("モード: {}", Self::mode_display(mode));
            }
            if data.running == Some(true) {
                println!("  実行中はモードを変更できません");
            }
        }
    }

    /// Shows the result of a duration edit.
    pub fn show_duration_success(response: &IpcResponse) {
        println!("* 時間を更新しました");

        if let Some(data) = &response.data {
            if let Some(work) = data.work_seconds {
                println!("  作業時間: {}分", work / 60);
            }
            if let Some(rest) = data.rest_seconds {
                println!("  休憩時間: {}分", rest / 60);
            }
        }
    }

    /// Shows the result of a sound selection.
    pub fn show_sound_success(response: &IpcResponse) {
        if let Some(data) = &response.data {
            if let Some(sound) = data.sound.as_deref() {
                println!("音声: {}", Self::sound_display(sound));
            }
        }
    }

    /// Shows the result of an infinite mode toggle.
    pub fn show_infinite_success(response: &IpcResponse) {
        if let Some(data) = &response.data {
            match data.infinite_mode {
                Some(true) => println!("無限ループ: オン"),
                Some(false) => println!("無限ループ: オフ"),
                None => {}
            }
        }
    }

    /// Shows the current timer status.
    pub fn show_status(response: &IpcResponse) {
        println!("ポモノイズ タイマー ステータス");
        println!("─────────────────────────────");

        if let Some(data) = &response.data {
            let running = data.running.unwrap_or(false);
            let mode = data.mode.as_deref().unwrap_or("unknown");

            let state_display = if running {
                match mode {
                    "work" => "作業中",
                    "rest" => "休憩中",
                    _ => mode,
                }
            } else {
                "停止中"
            };
            println!("状態: {}", state_display);
            println!("モード: {}", Self::mode_display(mode));

            if let Some(remaining) = data.remaining_seconds {
                let (minutes, seconds) = Self::format_time(remaining);
                println!("残り時間: {}:{:02}", minutes, seconds);
            }
            if let (Some(work), Some(rest)) = (data.work_seconds, data.rest_seconds) {
                println!("設定: 作業 {}分 / 休憩 {}分", work / 60, rest / 60);
            }
            if let Some(sound) = data.sound.as_deref() {
                println!("音声: {}", Self::sound_display(sound));
            }
            if let Some(infinite) = data.infinite_mode {
                println!("無限ループ: {}", if infinite { "オン" } else { "オフ" });
            }
        } else {
            println!("タイマーは起動していません");
        }
    }

    /// Shows the ambient track catalog.
    pub fn show_catalog() {
        println!("選択できる音声:");
        for entry in CATALOG {
            println!("  {:<12} {}", entry.id.name(), entry.label);
        }
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("エラー: {}", message);
    }

    /// Returns the display label of a wire mode name.
    fn mode_display(mode: &str) -> &str {
        match mode {
            "work" => "作業",
            "rest" => "休憩",
            other => other,
        }
    }

    /// Returns the display label of a wire sound name.
    fn sound_display(name: &str) -> &str {
        CATALOG
            .iter()
            .find(|entry| entry.id.name() == name)
            .map_or(name, |entry| entry.label)
    }

    /// Formats remaining seconds as (minutes, seconds).
    fn format_time(total_seconds: u32) -> (u32, u32) {
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;
        (minutes, seconds)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ResponseData, TimerState};

    // ------------------------------------------------------------------------
    // Format Time Tests
    // ------------------------------------------------------------------------

    mod format_time_tests {
        use super::*;

        #[test]
        fn test_format_time_zero() {
            let (minutes, seconds) = Display::format_time(0);
            assert_eq!(minutes, 0);
            assert_eq!(seconds, 0);
        }

        #[test]
        fn test_format_time_seconds_only() {
            let (minutes, seconds) = Display::format_time(45);
            assert_eq!(minutes, 0);
            assert_eq!(seconds, 45);
        }

        #[test]
        fn test_format_time_full_pomodoro() {
            let (minutes, seconds) = Display::format_time(25 * 60);
            assert_eq!(minutes, 25);
            assert_eq!(seconds, 0);
        }

        #[test]
        fn test_format_time_mixed() {
            let (minutes, seconds) = Display::format_time(61);
            assert_eq!(minutes, 1);
            assert_eq!(seconds, 1);
        }
    }

    // ------------------------------------------------------------------------
    // Label Tests
    // ------------------------------------------------------------------------

    mod label_tests {
        use super::*;

        #[test]
        fn test_mode_display() {
            assert_eq!(Display::mode_display("work"), "作業");
            assert_eq!(Display::mode_display("rest"), "休憩");
            assert_eq!(Display::mode_display("other"), "other");
        }

        #[test]
        fn test_sound_display_known() {
            assert_eq!(Display::sound_display("rain"), "雨音");
            assert_eq!(Display::sound_display("ocean"), "カフェの喧騒");
        }

        #[test]
        fn test_sound_display_unknown_passes_through() {
            assert_eq!(Display::sound_display("mystery"), "mystery");
        }
    }

    // ------------------------------------------------------------------------
    // Output smoke tests
    // ------------------------------------------------------------------------

    mod output_tests {
        use super::*;

        fn sample_response() -> IpcResponse {
            IpcResponse::success(
                "",
                Some(ResponseData::from_timer_state(&TimerState::new())),
            )
        }

        #[test]
        fn test_show_functions_do_not_panic() {
            let response = sample_response();
            Display::show_start_success(&response);
            Display::show_stop_success(&response);
            Display::show_mode_success(&response);
            Display::show_duration_success(&response);
            Display::show_sound_success(&response);
            Display::show_infinite_success(&response);
            Display::show_status(&response);
            Display::show_catalog();
            Display::show_error("test");
        }

        #[test]
        fn test_show_status_without_data() {
            let response = IpcResponse::success("", None);
            Display::show_status(&response);
        }
    }
}
