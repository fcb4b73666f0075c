//! Command implementations.

pub mod purge;
pub mod render;
pub mod seed;
pub mod show;
pub mod tag;

pub use self::purge::execute_purge;
pub use self::render::execute_render;
pub use self::seed::execute_seed;
pub use self::show::execute_show;
pub use self::tag::execute_tag;
