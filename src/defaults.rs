/// Day window used when the wizard sends no start time (10:00)
pub const DEFAULT_DAY_START_MINUTES: u32 = 10 * 60;

/// Day window used when the wizard sends no end time (22:00)
pub const DEFAULT_DAY_END_MINUTES: u32 = 22 * 60;

/// Stay assumed for a place selected without a duration
pub const DEFAULT_STAY_MINUTES: u32 = 120;

/// Shortest stay a user edit can set
pub const MIN_STAY_MINUTES: u32 = 15;
