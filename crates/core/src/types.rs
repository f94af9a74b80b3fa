/// All record and segment identities are 64-bit integers.
pub type DbId = i64;
