pub mod exe;
pub mod files;
pub mod omreport;

pub(crate) mod crate_private {
    pub trait Sealed {}
}
