/// Default maximum number of elements processed concurrently within one bundle
pub const DEFAULT_MAX_PARALLELISM: usize = 16;
/// Maximum allowed parallelism - hard ceiling on admission tickets per bundle
pub const MAX_PARALLELISM: usize = 65_536;
