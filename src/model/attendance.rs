/// The only status counted as a present day.
pub const PRESENT: &str = "Present";
/// Status recorded for roster employees left out of a submission.
pub const ABSENT: &str = "Absent";
