//! Formatting utilities

use glam::{DQuat, DVec3};
use humansize::{DECIMAL, format_size};

/// Format file size in human-readable format
pub fn format_bytes(bytes: u64) -> String {
    format_size(bytes, DECIMAL)
}

/// Format a clip length given in seconds
pub fn format_duration(seconds: f64) -> String {
    if seconds < 60.0 {
        format!("{seconds:.3}s")
    } else {
        let minutes = (seconds / 60.0).floor();
        format!("{minutes:.0}m {:.3}s", seconds - minutes * 60.0)
    }
}

/// Format a position or offset as `(x, y, z)`
pub fn format_vec3(v: DVec3) -> String {
    format!("({:.3}, {:.3}, {:.3})", v.x, v.y, v.z)
}

/// Format an orientation as `[x, y, z, w]`
pub fn format_quat(q: DQuat) -> String {
    format!("[{:.4}, {:.4}, {:.4}, {:.4}]", q.x, q.y, q.z, q.w)
}
