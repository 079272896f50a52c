//! Full query cycles driven through the shared channels, the way a GUI
//! process and the orchestrator interact.

use crate::helpers::Harness;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use voxshell::directive::Directive;
use voxshell::{ChannelKey, GuiFeed, LoopExit, RouteOutcome};

#[tokio::test]
async fn gui_mic_toggle_drives_cycles_until_exit() {
    let h = Harness::new();
    let orch = h.orchestrator(
        &["what is rust", "bye"],
        &[&["general what is rust"], &["exit"]],
    );
    orch.bootstrap().unwrap();

    let gui = GuiFeed::new(h.channels.clone());
    let before = gui.snapshot();
    assert!(!before.mic_enabled);
    assert_eq!(before.status, "Available ...");
    assert_eq!(
        before.transcript,
        h.conversation.identity().default_greeting()
    );

    let run = tokio::spawn(async move { orch.run(CancellationToken::new()).await });
    tokio::time::sleep(Duration::from_millis(20)).await;
    gui.set_mic(true).unwrap();

    let exit = tokio::time::timeout(Duration::from_secs(5), run)
        .await
        .expect("loop finishes")
        .unwrap()
        .unwrap();
    assert_eq!(exit, LoopExit::ExitRequested);

    let after = gui.snapshot();
    assert_eq!(
        after.transcript,
        "User : what is rust\n\
         Assistant : chat: What is rust?\n\
         User : bye\n\
         Assistant : chat: Okay, bye!"
    );
    assert_eq!(
        h.channels.read(ChannelKey::Database),
        Some(after.transcript.clone())
    );
    assert_eq!(after.status, "Answering...");
    assert_eq!(h.spoken().len(), 2);
}

#[tokio::test]
async fn idle_loop_waits_for_mic() {
    let h = Harness::new();
    let orch = h.orchestrator(&["hello"], &[&["general hello"]]);
    orch.bootstrap().unwrap();

    let cancel = CancellationToken::new();
    let stop = cancel.clone();
    let run = tokio::spawn(async move { orch.run(stop).await });

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(h.conversation.log().load().is_empty());
    assert!(h.chat.queries().is_empty());

    cancel.cancel();
    let exit = run.await.unwrap().unwrap();
    assert_eq!(exit, LoopExit::Cancelled);
}

#[tokio::test]
async fn mixed_directives_follow_precedence() {
    let h = Harness::new();
    let router = h.router_with(h.handlers());
    let directives: Vec<Directive> = [
        "open chrome",
        "general tell me a joke",
        "generate a red fox",
        "realtime weather today",
    ]
    .into_iter()
    .map(Directive::from)
    .collect();

    let outcome = router.route(&directives).await.unwrap();

    assert_eq!(
        outcome,
        RouteOutcome::Answered {
            answer: "search: Tell me a joke and weather today.".to_owned()
        }
    );
    assert_eq!(h.automation.0.lock().unwrap().clone(), vec![directives]);
    assert_eq!(
        h.channels.read(ChannelKey::ImageJob).as_deref(),
        Some("a red fox;True")
    );
    assert!(h.chat.queries().is_empty());
    assert_eq!(h.search.queries().len(), 1);
}

#[tokio::test]
async fn first_general_wins_and_automation_only_is_silent() {
    let h = Harness::new();
    let router = h.router_with(h.handlers());

    let general: Vec<Directive> = ["general how are you", "general what time is it"]
        .into_iter()
        .map(Directive::from)
        .collect();
    router.route(&general).await.unwrap();
    assert_eq!(h.chat.queries(), ["How are you?"]);

    let automation: Vec<Directive> = ["open notepad", "close chrome"]
        .into_iter()
        .map(Directive::from)
        .collect();
    assert_eq!(router.route(&automation).await.unwrap(), RouteOutcome::Silent);
    assert_eq!(h.automation.0.lock().unwrap().len(), 1);
    assert_eq!(h.spoken().len(), 1);
}
