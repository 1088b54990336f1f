/// Example to resolve a version string against the current repository
///
/// Usage:
///   cargo run --example resolve [version]
///
use gitpin::git::{GitRunner, Resolver};

#[tokio::main]
async fn main() {
    let version = std::env::args().nth(1);

    let runner = match GitRunner::discover() {
        Ok(runner) => runner,
        Err(e) => {
            eprintln!("Error: Not in a git repository: {}", e);
            std::process::exit(1);
        }
    };

    println!("Repository: {}", runner.repo_path().display());

    let resolver = Resolver::new(Box::new(runner));
    match resolver.validate_version(version.as_deref()).await {
        Ok(resolution) => {
            println!("Resolved: {} ({})", resolution.version, resolution.ref_type);
            match resolver.hash_for_ref(&resolution.version).await {
                Ok(hash) => println!("Hash: {}", hash),
                Err(e) => eprintln!("Error resolving hash: {}", e),
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
