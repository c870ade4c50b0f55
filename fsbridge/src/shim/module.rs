//! Module lifetime
//!
//! The foreign runtime reference-counts loaded modules so it can unload them.
//! Here the driver is linked into the image and registered once at startup;
//! it lives as long as the image. [`StaticModule`] states that lifetime: its
//! reference operations succeed and change nothing.

/// Lifetime record of a driver linked into the image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticModule {
    name: &'static str,
}

impl StaticModule {
    /// Module named `name`
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }

    /// Module name
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Take a reference; always 0
    #[inline]
    pub fn reference(&self) -> i32 {
        0
    }

    /// Drop a reference; always 0
    #[inline]
    pub fn unreference(&self) -> i32 {
        0
    }

    /// Whether the module may be unloaded; never
    #[inline]
    pub const fn is_unloadable(&self) -> bool {
        false
    }
}
