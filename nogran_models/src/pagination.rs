use nutype::nutype;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaginationSlice {
    pub limit: PaginationLimit,
    pub offset: u64,
}

#[nutype(
    validate(greater_or_equal = 1, less_or_equal = PaginationLimit::MAX),
    derive(Debug, Clone, Copy, PartialEq, Eq, Deref, TryFrom, Serialize, Deserialize)
)]
pub struct PaginationLimit(u64);

impl PaginationLimit {
    pub const MAX: u64 = 100;

    pub fn max() -> Self {
        Self::try_new(Self::MAX).unwrap()
    }
}

impl Default for PaginationLimit {
    fn default() -> Self {
        Self::max()
    }
}
