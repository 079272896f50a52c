//! Image job hand-off between the coordinator, a worker and the GUI reader,
//! all sharing one channel directory.

use crate::helpers::{DiskGenerator, Harness};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use voxshell::image::coordinator::{ImageJobCoordinator, JobState};
use voxshell::image::worker::ImageWorker;
use voxshell::{ChannelKey, GuiFeed};

#[tokio::test]
async fn submitted_job_is_generated_and_shown() {
    let h = Harness::new();
    let images_dir = h.dir.path().join("Data");
    std::fs::create_dir_all(&images_dir).unwrap();

    let worker = ImageWorker::new(
        h.channels.clone(),
        DiskGenerator {
            dir: images_dir.clone(),
            count: 5,
        },
        Duration::from_millis(5),
    );
    let cancel = CancellationToken::new();
    let stop = cancel.clone();
    let worker_task = tokio::spawn(async move { worker.run(stop).await });

    let coordinator = ImageJobCoordinator::detached(h.channels.clone(), Duration::from_millis(5));
    let handle = coordinator.submit("a cat wearing a hat").unwrap();

    let state = handle
        .wait_for_completion(Duration::from_secs(5))
        .await
        .unwrap();
    assert_eq!(state, JobState::Completed);
    assert_eq!(
        h.channels.read(ChannelKey::ImageJob).as_deref(),
        Some("a cat wearing a hat;False")
    );

    let shown = GuiFeed::new(h.channels.clone()).image_paths();
    assert_eq!(shown.len(), 4);
    assert_eq!(shown[0], images_dir.join("a_cat_wearing_a_hat1.png"));

    cancel.cancel();
    worker_task.await.unwrap();
}

#[tokio::test]
async fn later_submit_supersedes_pending_job() {
    let h = Harness::new();
    let coordinator = ImageJobCoordinator::detached(h.channels.clone(), Duration::from_millis(5));

    let first = coordinator.submit("a dog").unwrap();
    let second = coordinator.submit("a horse").unwrap();

    assert_eq!(first.state(), JobState::Superseded);
    assert_eq!(second.state(), JobState::Pending);
    assert!(
        second
            .wait_for_completion(Duration::from_millis(30))
            .await
            .is_err()
    );
}

#[tokio::test]
async fn router_submission_does_not_block_the_answer() {
    let h = Harness::new();
    let router = h.router_with(h.handlers());
    let directives: Vec<_> = ["generate a lighthouse at dusk", "general describe it"]
        .into_iter()
        .map(voxshell::Directive::from)
        .collect();

    // No worker is running, so the job stays pending while the answer lands.
    let outcome = tokio::time::timeout(Duration::from_secs(1), router.route(&directives))
        .await
        .expect("route returns without waiting on the image job")
        .unwrap();

    assert!(matches!(outcome, voxshell::RouteOutcome::Answered { .. }));
    assert_eq!(
        h.channels.read(ChannelKey::ImageJob).as_deref(),
        Some("a lighthouse at dusk;True")
    );
}
