// ABOUTME: Field extraction strategies over LinkedIn job pages.
// ABOUTME: rules holds the shared candidate tables; structural and soup consume them.

pub mod rules;
pub mod soup;
pub mod structural;
