//! Memory Floors and Capacity Limits

/// Free-heap floor below which system-error is raised (bytes).
///
/// Advisory only: the loop keeps running, the flag rides out in
/// telemetry so the fragmentation trend is visible off-device.
///
/// Source: ESP32 field experience (Wi-Fi stack churn under ~10KB free)
pub const LOW_HEAP_FLOOR_BYTES: u32 = 10_240;

/// Maximum number of sensor drivers one loop can own.
pub const MAX_DRIVERS: usize = 8;
