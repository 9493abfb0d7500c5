//! In-memory integration tests for node deployment lifecycle management.

use std::sync::Arc;

use haussmann::deployment::{
    adapters::memory::{
        InMemoryApplicationManagerFactory, InMemoryDirectoryService, InMemoryObjectPublisher,
    },
    domain::{DeploymentPlan, NodeName, PlanId, PropertyMap, ResourceCommitmentHint},
    ports::{DirectoryError, DirectoryResult, DirectoryService},
    services::{NodeDeploymentManager, NodeManagerError},
};
use async_trait::async_trait;
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use serde_json::json;
use tokio::task::JoinSet;

type TestManager = NodeDeploymentManager<
    InMemoryObjectPublisher,
    InMemoryApplicationManagerFactory,
    DefaultClock,
>;

struct TestContext {
    directory: Arc<InMemoryDirectoryService>,
    publisher: Arc<InMemoryObjectPublisher>,
    factory: Arc<InMemoryApplicationManagerFactory>,
    manager: Arc<TestManager>,
}

#[fixture]
async fn context() -> TestContext {
    let directory = Arc::new(InMemoryDirectoryService::new());
    let publisher = Arc::new(InMemoryObjectPublisher::new());
    let factory = Arc::new(InMemoryApplicationManagerFactory::new());
    let manager = NodeDeploymentManager::new(
        NodeName::new("node-a").expect("valid node name"),
        &PropertyMap::new(),
        directory.clone(),
        publisher.clone(),
        factory.clone(),
        Arc::new(DefaultClock),
    )
    .await
    .expect("manager construction should succeed");

    TestContext {
        directory,
        publisher,
        factory,
        manager: Arc::new(manager),
    }
}

fn plan(id: &str) -> DeploymentPlan {
    DeploymentPlan::new(
        PlanId::new(id).expect("valid plan id"),
        json!({"artifact": format!("{id}.bundle")}),
    )
}

fn plan_id(id: &str) -> PlanId {
    PlanId::new(id).expect("valid plan id")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn prepare_destroy_round_trip_frees_the_identifier(#[future] context: TestContext) {
    let context = context.await;
    let hint = ResourceCommitmentHint::none();

    let handle = context
        .manager
        .prepare_plan(&plan("plan-rt"), &hint)
        .await
        .expect("preparation should succeed");
    context
        .manager
        .destroy_manager(&handle)
        .await
        .expect("destruction should succeed");

    assert!(context.manager.active_plans().await.is_empty());
    assert_eq!(context.publisher.live_handles(), 0);

    context
        .manager
        .prepare_plan(&plan("plan-rt"), &hint)
        .await
        .expect("identifier should be reusable once freed");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn destroy_suppresses_a_failing_teardown(#[future] context: TestContext) {
    let context = context.await;
    context.factory.fail_teardown_for(plan_id("plan-flaky"));
    let handle = context
        .manager
        .prepare_plan(&plan("plan-flaky"), &ResourceCommitmentHint::none())
        .await
        .expect("preparation should succeed");

    context
        .manager
        .destroy_manager(&handle)
        .await
        .expect("teardown failure must not surface to the caller");

    assert!(context.manager.active_plans().await.is_empty());
    assert_eq!(context.publisher.live_handles(), 0);
    assert_eq!(context.factory.teardown_count(&plan_id("plan-flaky")), 1);

    let repeat = context.manager.destroy_manager(&handle).await;
    assert!(matches!(repeat, Err(NodeManagerError::InvalidReference)));
    assert_eq!(context.factory.teardown_count(&plan_id("plan-flaky")), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn publish_failure_propagates_and_releases_the_orphan(#[future] context: TestContext) {
    let context = context.await;
    context.publisher.fail_publish_for(plan_id("plan-unpub"));

    let result = context
        .manager
        .prepare_plan(&plan("plan-unpub"), &ResourceCommitmentHint::none())
        .await;

    assert!(matches!(result, Err(NodeManagerError::Publisher(_))));
    assert!(context.manager.active_plans().await.is_empty());
    assert_eq!(context.publisher.live_handles(), 0);
    assert_eq!(context.factory.created_count(&plan_id("plan-unpub")), 1);
    assert_eq!(
        context.factory.teardown_count(&plan_id("plan-unpub")),
        1,
        "the unregistered instance should be released before the error propagates"
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_submissions_of_one_plan_admit_exactly_one(#[future] context: TestContext) {
    let context = context.await;
    let mut tasks = JoinSet::new();

    for _ in 0..16 {
        let manager = context.manager.clone();
        tasks.spawn(async move {
            manager
                .prepare_plan(&plan("plan-race"), &ResourceCommitmentHint::none())
                .await
        });
    }

    let mut successes = 0;
    let mut duplicates = 0;
    while let Some(joined) = tasks.join_next().await {
        match joined.expect("task should not panic") {
            Ok(_) => successes += 1,
            Err(NodeManagerError::DuplicatePlan(id)) => {
                assert_eq!(id, plan_id("plan-race"));
                duplicates += 1;
            }
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(successes, 1, "exactly one submission must win");
    assert_eq!(duplicates, 15);
    assert_eq!(context.factory.created_count(&plan_id("plan-race")), 1);
    assert_eq!(context.manager.active_plans().await, vec![plan_id("plan-race")]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn shutdown_drains_every_entry_despite_one_failing_teardown(#[future] context: TestContext) {
    let context = context.await;
    let hint = ResourceCommitmentHint::none();
    context.factory.fail_teardown_for(plan_id("plan-b"));

    for id in ["plan-a", "plan-b", "plan-c"] {
        context
            .manager
            .prepare_plan(&plan(id), &hint)
            .await
            .expect("preparation should succeed");
    }

    context.manager.shutdown().await;

    assert!(context.manager.active_plans().await.is_empty());
    assert_eq!(context.publisher.live_handles(), 0);
    for id in ["plan-a", "plan-b", "plan-c"] {
        assert_eq!(
            context.factory.teardown_count(&plan_id(id)),
            1,
            "teardown of {id} should be invoked exactly once"
        );
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn shutdown_is_idempotent(#[future] context: TestContext) {
    let context = context.await;
    context
        .manager
        .prepare_plan(&plan("plan-a"), &ResourceCommitmentHint::none())
        .await
        .expect("preparation should succeed");

    context.manager.shutdown().await;
    context.manager.shutdown().await;

    assert_eq!(context.factory.teardown_count(&plan_id("plan-a")), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn handles_stay_invalid_after_shutdown(#[future] context: TestContext) {
    let context = context.await;
    let handle = context
        .manager
        .prepare_plan(&plan("plan-a"), &ResourceCommitmentHint::none())
        .await
        .expect("preparation should succeed");

    context.manager.shutdown().await;

    let result = context.manager.destroy_manager(&handle).await;
    assert!(matches!(result, Err(NodeManagerError::InvalidReference)));
}

// The upstream contract registers the node at construction and never
// deregisters it, not even during shutdown. This pins the gap as
// intentionally-unspecified behaviour rather than guessing a fix.
#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn shutdown_leaves_directory_registration_in_place(#[future] context: TestContext) {
    let context = context.await;

    context.manager.shutdown().await;

    let registered = context.directory.registered_nodes();
    assert_eq!(registered.len(), 1);
    assert_eq!(registered.first().map(NodeName::as_str), Some("node-a"));
}

mockall::mock! {
    Directory {}

    #[async_trait]
    impl DirectoryService for Directory {
        async fn register_node(&self, node: &NodeName) -> DirectoryResult<()>;
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn construction_propagates_directory_rejection() {
    let mut directory = MockDirectory::new();
    directory.expect_register_node().returning(|node| {
        Err(DirectoryError::RegistrationRejected {
            node: node.clone(),
            reason: "directory is read-only".to_owned(),
        })
    });

    let result = NodeDeploymentManager::new(
        NodeName::new("node-a").expect("valid node name"),
        &PropertyMap::new(),
        Arc::new(directory),
        Arc::new(InMemoryObjectPublisher::new()),
        Arc::new(InMemoryApplicationManagerFactory::new()),
        Arc::new(DefaultClock),
    )
    .await;

    assert!(matches!(result, Err(NodeManagerError::Directory(_))));
}
