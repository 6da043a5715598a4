// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use keyward_core::{KeywardError, UserId};
use keyward_migration::{
    EncryptedMigration, EncryptedMigrator, MigrationRecord, MigrationRequirement,
};
use secrecy::SecretString;
use tracing_test::traced_test;

#[derive(Clone, Copy)]
enum Behavior {
    Succeed,
    Fail,
    Sleep(Duration),
    Hang,
}

/// Pending until applied; optionally gated on another migration.
struct TestMigration {
    name: &'static str,
    pending_as: MigrationRequirement,
    after: Option<Arc<TestMigration>>,
    behavior: Mutex<Behavior>,
    applied: AtomicBool,
    runs: AtomicUsize,
    saw_password: AtomicBool,
    log: Arc<Mutex<Vec<&'static str>>>,
}

impl TestMigration {
    fn new(name: &'static str, log: &Arc<Mutex<Vec<&'static str>>>) -> Self {
        Self {
            name,
            pending_as: MigrationRequirement::NeedsMigration,
            after: None,
            behavior: Mutex::new(Behavior::Succeed),
            applied: AtomicBool::new(false),
            runs: AtomicUsize::new(0),
            saw_password: AtomicBool::new(false),
            log: log.clone(),
        }
    }

    fn needing_password(mut self) -> Self {
        self.pending_as = MigrationRequirement::NeedsMigrationWithMasterPassword;
        self
    }

    fn after(mut self, other: &Arc<TestMigration>) -> Self {
        self.after = Some(other.clone());
        self
    }

    fn behaving(self, behavior: Behavior) -> Self {
        *self.behavior.lock().unwrap() = behavior;
        self
    }

    fn set_behavior(&self, behavior: Behavior) {
        *self.behavior.lock().unwrap() = behavior;
    }

    fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }

    fn is_applied(&self) -> bool {
        self.applied.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EncryptedMigration for TestMigration {
    async fn needs_migration(
        &self,
        _user_id: &UserId,
    ) -> Result<MigrationRequirement, KeywardError> {
        let gated = self.after.as_ref().is_some_and(|a| !a.is_applied());
        if self.is_applied() || gated {
            Ok(MigrationRequirement::NoMigrationNeeded)
        } else {
            Ok(self.pending_as)
        }
    }

    async fn run_migrations(
        &self,
        _user_id: &UserId,
        master_password: Option<&SecretString>,
    ) -> Result<(), KeywardError> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        self.saw_password
            .store(master_password.is_some(), Ordering::SeqCst);
        let behavior = *self.behavior.lock().unwrap();
        match behavior {
            Behavior::Succeed => {}
            Behavior::Fail => return Err(KeywardError::Internal(format!("{} broke", self.name))),
            Behavior::Sleep(d) => tokio::time::sleep(d).await,
            Behavior::Hang => std::future::pending::<()>().await,
        }
        self.log.lock().unwrap().push(self.name);
        self.applied.store(true, Ordering::SeqCst);
        Ok(())
    }
}

fn build_migrator(migrations: &[&Arc<TestMigration>]) -> EncryptedMigrator {
    EncryptedMigrator::new(
        migrations
            .iter()
            .map(|m| MigrationRecord::new(m.name, (*m).clone()))
            .collect(),
    )
}

fn user() -> UserId {
    UserId::from("user-1")
}

fn password() -> SecretString {
    SecretString::from("pw".to_string())
}

#[tokio::test]
async fn needs_migrations_reports_the_most_severe() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let plain = Arc::new(TestMigration::new("plain", &log));
    let locked = Arc::new(TestMigration::new("locked", &log).needing_password());
    let migrator = build_migrator(&[&plain, &locked]);

    assert_eq!(
        migrator.needs_migrations(&user()).await.unwrap(),
        MigrationRequirement::NeedsMigrationWithMasterPassword
    );
    assert_eq!(migrator.migration_names(), vec!["plain", "locked"]);
}

#[tokio::test]
async fn second_run_is_a_no_op() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let a = Arc::new(TestMigration::new("a", &log));
    let migrator = build_migrator(&[&a]);

    migrator.run_migrations(&user(), None).await.unwrap();
    migrator.run_migrations(&user(), None).await.unwrap();

    assert_eq!(a.runs(), 1);
    assert_eq!(
        migrator.needs_migrations(&user()).await.unwrap(),
        MigrationRequirement::NoMigrationNeeded
    );
}

#[tokio::test]
async fn earlier_migration_enables_later_one_in_same_pass() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let a = Arc::new(TestMigration::new("a", &log));
    let b = Arc::new(TestMigration::new("b", &log).after(&a));
    let migrator = build_migrator(&[&a, &b]);

    migrator.run_migrations(&user(), None).await.unwrap();

    assert_eq!(*log.lock().unwrap(), vec!["a", "b"]);
}

#[tokio::test]
async fn concurrent_passes_run_each_migration_once() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let slow = Arc::new(
        TestMigration::new("slow", &log).behaving(Behavior::Sleep(Duration::from_millis(50))),
    );
    let migrator = build_migrator(&[&slow]);

    let (user_a, user_b) = (user(), user());
    let (first, second) = tokio::join!(
        migrator.run_migrations(&user_a, None),
        migrator.run_migrations(&user_b, None)
    );

    first.unwrap();
    second.unwrap();
    assert_eq!(slow.runs(), 1);
    assert!(!migrator.is_running());
}

#[tokio::test]
async fn concurrent_passes_across_tasks_run_each_migration_once() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let slow = Arc::new(
        TestMigration::new("slow", &log).behaving(Behavior::Sleep(Duration::from_millis(100))),
    );
    let migrator = Arc::new(build_migrator(&[&slow]));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let migrator = migrator.clone();
            tokio::spawn(async move { migrator.run_migrations(&user(), None).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(slow.runs(), 1);
}

#[tokio::test]
async fn passes_for_different_users_share_one_lock() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let slow = Arc::new(
        TestMigration::new("slow", &log).behaving(Behavior::Sleep(Duration::from_millis(50))),
    );
    let migrator = build_migrator(&[&slow]);
    let alice = UserId::from("alice");
    let bob = UserId::from("bob");

    let (first, second) = tokio::join!(
        migrator.run_migrations(&alice, None),
        migrator.run_migrations(&bob, None)
    );

    first.unwrap();
    second.unwrap();
    assert_eq!(slow.runs(), 1);
    assert!(!migrator.is_running());
}

#[tokio::test]
async fn without_password_every_unit_is_deferred() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let locked = Arc::new(TestMigration::new("locked", &log).needing_password());
    let migrator = build_migrator(&[&locked]);

    migrator.run_migrations(&user(), None).await.unwrap();

    assert_eq!(locked.runs(), 0);
    assert!(!migrator.is_running());
}

#[tokio::test]
async fn password_is_passed_through_to_units() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let plain = Arc::new(TestMigration::new("plain", &log));
    let locked = Arc::new(TestMigration::new("locked", &log).needing_password());
    let migrator = build_migrator(&[&plain, &locked]);

    migrator.run_migrations(&user(), Some(&password())).await.unwrap();

    assert_eq!(plain.runs(), 1);
    assert_eq!(locked.runs(), 1);
    assert!(locked.saw_password.load(Ordering::SeqCst));
}

#[tokio::test]
#[traced_test]
async fn password_unit_enabled_mid_pass_is_skipped_without_password() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let plain = Arc::new(TestMigration::new("plain", &log));
    // Only becomes pending once `plain` has run, so the pass starts without a password.
    let late = Arc::new(TestMigration::new("late", &log).needing_password().after(&plain));
    let migrator = build_migrator(&[&plain, &late]);

    migrator.run_migrations(&user(), None).await.unwrap();

    assert_eq!(plain.runs(), 1);
    assert_eq!(late.runs(), 0);
    assert!(logs_contain("skipping migration that needs the master password"));
    assert!(logs_contain("late"));
    assert_eq!(
        migrator.needs_migrations(&user()).await.unwrap(),
        MigrationRequirement::NeedsMigrationWithMasterPassword
    );
}

#[tokio::test]
#[traced_test]
async fn failure_aborts_pass_and_releases_the_flag() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let a = Arc::new(TestMigration::new("a", &log));
    let b = Arc::new(TestMigration::new("b", &log).behaving(Behavior::Fail));
    let c = Arc::new(TestMigration::new("c", &log));
    let migrator = build_migrator(&[&a, &b, &c]);

    let err = migrator.run_migrations(&user(), None).await.unwrap_err();

    assert!(matches!(err, KeywardError::Internal(ref m) if m == "b broke"));
    assert!(a.is_applied());
    assert_eq!(c.runs(), 0);
    assert!(!migrator.is_running());
    assert!(logs_contain("migration failed, aborting pass"));

    // The next pass re-evaluates: a is done, b is retried, c runs.
    b.set_behavior(Behavior::Succeed);
    migrator.run_migrations(&user(), None).await.unwrap();
    assert_eq!(a.runs(), 1);
    assert_eq!(b.runs(), 2);
    assert_eq!(c.runs(), 1);
}

#[tokio::test]
async fn cancelled_pass_releases_the_flag() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let stuck = Arc::new(TestMigration::new("stuck", &log).behaving(Behavior::Hang));
    let migrator = build_migrator(&[&stuck]);

    let timed_out =
        tokio::time::timeout(Duration::from_millis(20), migrator.run_migrations(&user(), None))
            .await;

    assert!(timed_out.is_err());
    assert!(!migrator.is_running());

    stuck.set_behavior(Behavior::Succeed);
    migrator.run_migrations(&user(), None).await.unwrap();
    assert!(stuck.is_applied());
}

#[tokio::test]
#[traced_test]
async fn applied_migration_is_logged_with_timing() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let a = Arc::new(TestMigration::new("timed", &log));
    let migrator = build_migrator(&[&a]);

    migrator.run_migrations(&user(), None).await.unwrap();

    assert!(logs_contain("migration applied"));
    assert!(logs_contain("elapsed_ms"));
    assert!(logs_contain("user-1"));
}
