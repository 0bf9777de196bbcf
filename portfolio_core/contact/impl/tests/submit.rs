use std::{fs, path::Path, sync::Arc, time::Duration};

use chrono::{SubsecRound, Utc};
use portfolio_core_contact_contracts::{ContactService, ContactSubmitError, ContactSubmitOutcome};
use portfolio_core_contact_impl::{ContactServiceConfig, ContactServiceImpl};
use portfolio_demo::{form, JANE, MAX};
use portfolio_extern_impl::relay::{RelayApiServiceConfig, RelayApiServiceImpl, DEFAULT_TIMEOUT};
use portfolio_models::contact::{ContactField, ContactForm};
use portfolio_persistence_contracts::MessageLog;
use portfolio_persistence_csv::CsvMessageLog;
use portfolio_shared_impl::time::TimeServiceImpl;
use portfolio_testing::relay::{spawn_server, Inbox};
use portfolio_utils::assert_matches;
use tempfile::TempDir;

type Sut = ContactServiceImpl<TimeServiceImpl, CsvMessageLog, RelayApiServiceImpl>;

#[tokio::test]
async fn saved_locally_only_appends_one_row() {
    let env = setup(None, DEFAULT_TIMEOUT).await;

    let start = Utc::now().trunc_subsecs(6);
    let result = env.sut.submit(form(&JANE)).await.unwrap();
    let end = Utc::now();

    assert_eq!(result, ContactSubmitOutcome::SavedLocallyOnly);

    let rows = env.log.list().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, JANE.name);
    assert_eq!(rows[0].email, JANE.email);
    assert_eq!(rows[0].message, JANE.message);
    assert!(start <= rows[0].timestamp && rows[0].timestamp <= end);

    let content = fs::read_to_string(env.log.path()).unwrap();
    assert!(content.starts_with("timestamp,name,email,message\n"));
    assert_eq!(content.lines().count(), 2);

    assert!(env.inbox.messages().await.is_empty());
}

#[tokio::test]
async fn invalid_form_does_not_create_log() {
    let env = setup(Some("owner@example.com"), DEFAULT_TIMEOUT).await;

    for input in [
        ContactForm::default(),
        ContactForm {
            name: "Jane".into(),
            email: "   ".into(),
            message: "Hi".into(),
        },
        ContactForm {
            name: "\t".into(),
            email: "jane@example.com".into(),
            message: "Hi".into(),
        },
    ] {
        let result = env.sut.submit(input).await;
        assert_matches!(result, Err(ContactSubmitError::Validation(_)));
    }

    let result = env
        .sut
        .submit(ContactForm {
            name: "Jane".into(),
            email: "jane@example.com".into(),
            message: " \n ".into(),
        })
        .await;
    assert_matches!(
        result,
        Err(ContactSubmitError::Validation(fields)) if fields == &[ContactField::Message]
    );

    assert!(!env.log.path().exists());
    assert!(env.inbox.messages().await.is_empty());
}

#[tokio::test]
async fn delivered_with_working_relay() {
    let env = setup(Some("owner@example.com"), DEFAULT_TIMEOUT).await;

    let result = env.sut.submit(form(&MAX)).await.unwrap();

    assert_eq!(result, ContactSubmitOutcome::Delivered);
    assert_eq!(env.log.list().await.unwrap().len(), 1);

    let messages = env.inbox.messages().await;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].destination, "owner@example.com");
    assert_eq!(messages[0].message, *MAX.message);
}

#[tokio::test]
async fn failing_relay_falls_back() {
    let env = setup(Some("fail@example.com"), DEFAULT_TIMEOUT).await;

    let result = env.sut.submit(form(&JANE)).await.unwrap();

    assert_matches!(
        result,
        ContactSubmitOutcome::SavedWithFallback { fallback_link }
            if fallback_link.starts_with("mailto:fail@example.com?")
                && fallback_link.contains("Jane%20Doe")
                && fallback_link.contains("body=Hello%20there")
    );
    assert_eq!(env.log.list().await.unwrap().len(), 1);
    assert_eq!(env.inbox.messages().await.len(), 1);
}

#[tokio::test]
async fn slow_relay_falls_back() {
    let env = setup(Some("slow@example.com"), Duration::from_millis(200)).await;

    let result = env.sut.submit(form(&JANE)).await.unwrap();

    assert_matches!(result, ContactSubmitOutcome::SavedWithFallback { .. });
    assert_eq!(env.log.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn persistence_failure_skips_relay() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("blocker"), "not a directory").unwrap();
    let env = setup_with_log(
        dir,
        Path::new("blocker/messages.csv"),
        Some("owner@example.com"),
        DEFAULT_TIMEOUT,
    )
    .await;

    let result = env.sut.submit(form(&JANE)).await;

    assert_matches!(result, Err(ContactSubmitError::Persistence(_)));
    assert!(env.inbox.messages().await.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_submissions() {
    let env = setup(Some("owner@example.com"), DEFAULT_TIMEOUT).await;
    let sut = Arc::new(env.sut);

    let tasks = [&*JANE, &*MAX].map(|submission| {
        let sut = Arc::clone(&sut);
        let input = form(submission);
        tokio::spawn(async move { sut.submit(input).await })
    });
    for task in tasks {
        let result = task.await.unwrap().unwrap();
        assert_eq!(result, ContactSubmitOutcome::Delivered);
    }

    let mut names = env
        .log
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|s| (*s.name).clone())
        .collect::<Vec<_>>();
    names.sort();
    assert_eq!(names, [(*JANE.name).clone(), (*MAX.name).clone()]);
    assert_eq!(env.inbox.messages().await.len(), 2);
}

struct Env {
    _dir: TempDir,
    sut: Sut,
    log: CsvMessageLog,
    inbox: Inbox,
}

async fn setup(destination: Option<&str>, timeout: Duration) -> Env {
    let dir = tempfile::tempdir().unwrap();
    setup_with_log(dir, Path::new("data/messages.csv"), destination, timeout).await
}

async fn setup_with_log(
    dir: TempDir,
    relative: &Path,
    destination: Option<&str>,
    timeout: Duration,
) -> Env {
    let (endpoint, inbox) = spawn_server().await.unwrap();

    let log = CsvMessageLog::new(dir.path().join(relative));
    let relay = RelayApiServiceImpl::new(RelayApiServiceConfig::new(Some(endpoint), timeout));
    let config = ContactServiceConfig {
        relay_destination: destination.map(Into::into),
    };

    Env {
        sut: ContactServiceImpl::new(TimeServiceImpl, log.clone(), relay, config),
        log,
        inbox,
        _dir: dir,
    }
}
