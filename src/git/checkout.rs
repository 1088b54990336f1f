use crate::error::GitResult;
use crate::git::resolver::Resolver;
use crate::git::runner::RunOptions;

impl Resolver {
    /// Check out `name`, dispatching on what it names
    ///
    /// Branches take the branch path so the work tree ends up pinned to the
    /// remote state; tags and hashes are plain checkouts.
    pub async fn checkout_ref(&self, name: &str) -> GitResult<()> {
        if self.is_branch(name).await? {
            self.checkout_branch(name).await
        } else {
            self.checkout_tag_or_hash(name).await
        }
    }

    /// Check out a tag or commit hash, leaving HEAD detached
    pub async fn checkout_tag_or_hash(&self, name: &str) -> GitResult<()> {
        self.runner().run(&["checkout", name], RunOptions::default()).await?;
        Ok(())
    }

    /// Check out a branch and hard-reset it to the remote state
    ///
    /// A branch that only exists on the remote gets a local tracking branch
    /// first. The reset runs even when the local branch already exists, so
    /// stale local commits never survive a checkout.
    pub async fn checkout_branch(&self, branch: &str) -> GitResult<()> {
        let target = format!("{}/{}", self.remote(), branch);

        if self.is_local_branch(branch).await? {
            self.runner()
                .run(&["checkout", branch], RunOptions::default())
                .await?;
        } else {
            self.runner()
                .run(&["checkout", "-b", branch, &target], RunOptions::default())
                .await?;
        }

        self.runner()
            .run(&["reset", "--hard", &target], RunOptions::default())
            .await?;
        Ok(())
    }
}
