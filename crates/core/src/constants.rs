/// Days advanced from the first of the month for a weekly occurrence date
pub const WEEKLY_OFFSET_DAYS: i64 = 7;

/// Days advanced from the first of the month for a biweekly occurrence date
pub const BIWEEKLY_OFFSET_DAYS: i64 = 14;
