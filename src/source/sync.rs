//! Keeps a sparse local copy of the remote documentation tree.
//!
//! The first run initialises a repository that only materialises the
//! documentation subdirectory. Later runs fetch and fast-forward that copy.
//! Whatever goes wrong, the local copy is removed before the error is
//! returned so the next run starts from a clean clone.

use super::RemoteSource;
use crate::error::ProcessingError;
use anyhow::{anyhow, Context, Result};
use git2::build::CheckoutBuilder;
use git2::{BranchType, FetchOptions, RemoteCallbacks, Repository};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

/// Make sure `source.local_dir` holds an up to date checkout of the remote.
pub fn sync(source: &RemoteSource) -> Result<(), ProcessingError> {
    let result = if source.local_dir.exists() {
        println!("Updating existing repository...");
        update(source)
    } else {
        println!("Cloning repository...");
        clone(source)
    };

    match result {
        Ok(()) => {
            println!("Repository ready at {}", source.local_dir.display());
            Ok(())
        }
        Err(e) => {
            cleanup_directory(&source.local_dir);
            Err(ProcessingError::Sync(format!("{e:#}")))
        }
    }
}

fn cleanup_directory(directory: &Path) {
    if directory.exists() {
        if let Err(e) = std::fs::remove_dir_all(directory) {
            log::warn!("Failed to clean up directory {}: {e}", directory.display());
        }
    }
}

fn clone(source: &RemoteSource) -> Result<()> {
    std::fs::create_dir_all(&source.local_dir).with_context(|| {
        format!(
            "Failed to create repository directory {}",
            source.local_dir.display()
        )
    })?;

    let repo = Repository::init(&source.local_dir).with_context(|| {
        format!(
            "Failed to initialise repository at {}",
            source.local_dir.display()
        )
    })?;

    // libgit2 ignores this, but it keeps the copy sparse for the git CLI too
    repo.config()
        .with_context(|| "Failed to open repository config")?
        .set_bool("core.sparseCheckout", true)
        .with_context(|| "Failed to enable sparse checkout")?;
    let info_dir = repo.path().join("info");
    std::fs::create_dir_all(&info_dir)
        .with_context(|| format!("Failed to create {}", info_dir.display()))?;
    std::fs::write(
        info_dir.join("sparse-checkout"),
        format!("/{}/*\n", source.docs_dir.trim_matches('/')),
    )
    .with_context(|| "Failed to write sparse-checkout patterns")?;

    let mut remote = repo
        .remote("origin", &source.url)
        .with_context(|| format!("Failed to add remote {}", source.url))?;
    fetch(&mut remote, source)?;
    drop(remote);

    let commit = repo
        .find_reference(&source.remote_ref())
        .with_context(|| format!("Remote has no branch named {}", source.branch))?
        .peel_to_commit()
        .with_context(|| format!("Branch {} doesn't point at a commit", source.branch))?;

    let mut branch = repo
        .branch(&source.branch, &commit, true)
        .with_context(|| format!("Failed to create local branch {}", source.branch))?;
    branch
        .set_upstream(Some(&format!("origin/{}", source.branch)))
        .with_context(|| format!("Failed to track origin/{}", source.branch))?;
    repo.set_head(&source.local_ref())
        .with_context(|| format!("Failed to switch to branch {}", source.branch))?;

    checkout(&repo, source)
}

fn update(source: &RemoteSource) -> Result<()> {
    let repo = Repository::open(&source.local_dir).with_context(|| {
        format!(
            "Failed to open path {} as a git repository!",
            source.local_dir.display()
        )
    })?;

    let mut remote = repo
        .find_remote("origin")
        .with_context(|| "Repository has no remote named origin")?;
    fetch(&mut remote, source)?;
    drop(remote);

    let fetch_ref = repo
        .find_reference(&source.remote_ref())
        .with_context(|| format!("Remote has no branch named {}", source.branch))?;
    let fetch_commit = repo
        .reference_to_annotated_commit(&fetch_ref)
        .with_context(|| "Failed to resolve fetched commit")?;

    // switch to the target branch, creating it if this copy never had it
    if repo.find_branch(&source.branch, BranchType::Local).is_err() {
        let commit = fetch_ref
            .peel_to_commit()
            .with_context(|| format!("Branch {} doesn't point at a commit", source.branch))?;
        repo.branch(&source.branch, &commit, false)
            .with_context(|| format!("Failed to create local branch {}", source.branch))?;
    }
    repo.set_head(&source.local_ref())
        .with_context(|| format!("Failed to switch to branch {}", source.branch))?;

    let (analysis, _) = repo
        .merge_analysis(&[&fetch_commit])
        .with_context(|| "Failed to analyse fetched changes")?;
    if analysis.is_up_to_date() {
        log::info!("{} is already up to date", source.branch);
    } else if analysis.is_fast_forward() {
        let mut local = repo
            .find_reference(&source.local_ref())
            .with_context(|| format!("Failed to find local branch {}", source.branch))?;
        local
            .set_target(fetch_commit.id(), "docs-pdf: fast-forward")
            .with_context(|| format!("Failed to fast-forward {}", source.branch))?;
    } else {
        return Err(anyhow!(
            "Local branch {} has diverged from origin and can't be fast-forwarded",
            source.branch
        ));
    }

    checkout(&repo, source)
}

fn fetch(remote: &mut git2::Remote, source: &RemoteSource) -> Result<()> {
    let branch = source.branch.as_str();
    let progress = ProgressBar::new(0);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("can parse progress style")
            .progress_chars("#>-"),
    );
    progress.set_message("objects");

    let mut callbacks = RemoteCallbacks::new();
    callbacks.transfer_progress(|stats| {
        progress.set_length(stats.total_objects() as u64);
        progress.set_position(stats.received_objects() as u64);
        true
    });

    let mut options = FetchOptions::new();
    options.remote_callbacks(callbacks);
    if source.shallow {
        options.depth(1);
    }

    let refspec = format!("+refs/heads/{branch}:refs/remotes/origin/{branch}");
    let result = remote
        .fetch(&[refspec.as_str()], Some(&mut options), None)
        .with_context(|| format!("Failed to fetch branch {branch}"));
    progress.finish_and_clear();
    result
}

fn checkout(repo: &Repository, source: &RemoteSource) -> Result<()> {
    let mut builder = CheckoutBuilder::new();
    builder.force();
    builder.path(source.docs_dir.trim_matches('/'));
    repo.checkout_head(Some(&mut builder))
        .with_context(|| format!("Failed to check out {}", source.docs_dir))
}
