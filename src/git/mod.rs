pub mod checkout;
pub mod parser;
pub mod resolver;
pub mod runner;
pub mod version;

pub use parser::{parse_changes, parse_show_ref, parse_tag_list, ChangeEntry, ShowRefEntry};
pub use resolver::{RefType, Resolver, TagOptions, VersionResolution};
pub use runner::{CommandError, CommandRunner, FailureKind, GitRunner, RunOptions};
pub use version::{GitVersion, MIN_GIT_VERSION};
