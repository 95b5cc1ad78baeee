//! Injection point propagation across async tasks
//!
//! These tests verify:
//! 1. A wrapped future sees its injection point across every await
//! 2. Tasks sharing worker threads never observe each other's point
//! 3. produce_async resolves the delegate with the point installed and
//!    returns delegate failures unchanged
//! 4. An abandoned resolution leaves no point installed

use rstest::*;
use std::convert::Infallible;
use std::time::Duration;
use tessera_di::current::nesting_depth;
use tessera_di::{
	AsyncReferenceProvider, CreationalContext, CurrentInjectionPointProvider, InjectionPoint,
	InjectionPointFutureExt, TypeDescriptor, current_injection_point,
};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("upstream timed out after {0:?}")]
struct UpstreamTimeout(Duration);

struct RequiredTypeProvider;

#[async_trait::async_trait]
impl AsyncReferenceProvider<String> for RequiredTypeProvider {
	type Error = Infallible;

	async fn produce(&self, _ctx: &CreationalContext) -> Result<String, Infallible> {
		tokio::task::yield_now().await;
		let before = current_injection_point();
		tokio::time::sleep(Duration::from_millis(1)).await;
		assert_eq!(current_injection_point(), before);
		Ok(before.required_type().to_string())
	}
}

struct TimingOutProvider;

#[async_trait::async_trait]
impl AsyncReferenceProvider<String> for TimingOutProvider {
	type Error = UpstreamTimeout;

	async fn produce(&self, _ctx: &CreationalContext) -> Result<String, UpstreamTimeout> {
		tokio::task::yield_now().await;
		Err(UpstreamTimeout(Duration::from_millis(250)))
	}
}

struct StalledProvider;

#[async_trait::async_trait]
impl AsyncReferenceProvider<u8> for StalledProvider {
	type Error = Infallible;

	async fn produce(&self, _ctx: &CreationalContext) -> Result<u8, Infallible> {
		tokio::time::sleep(Duration::from_secs(5)).await;
		Ok(0)
	}
}

fn point(name: &'static str) -> InjectionPoint {
	InjectionPoint::builder(TypeDescriptor::named(name)).build()
}

#[rstest]
#[tokio::test]
async fn test_point_survives_awaits() {
	// Arrange
	let a = point("app::A");
	let expected = a.clone();

	// Act
	let seen = async {
		let mut seen = Vec::new();
		for _ in 0..3 {
			seen.push(current_injection_point());
			tokio::task::yield_now().await;
		}
		seen
	}
	.with_injection_point(a)
	.await;

	// Assert
	assert!(seen.iter().all(|p| *p == expected));
	assert!(current_injection_point().is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_tasks_do_not_leak_points() {
	// Arrange
	let tasks: Vec<_> = (0..16)
		.map(|i| {
			let point =
				InjectionPoint::builder(TypeDescriptor::named(format!("app::Task{}", i))).build();
			let expected = point.clone();
			tokio::spawn(
				async move {
					for _ in 0..8 {
						if current_injection_point() != expected {
							return false;
						}
						tokio::task::yield_now().await;
					}
					true
				}
				.with_injection_point(point),
			)
		})
		.collect();

	// Act
	let results = futures::future::join_all(tasks).await;

	// Assert
	assert!(results.into_iter().all(|r| r.unwrap()));
	assert!(current_injection_point().is_empty());
}

#[rstest]
#[tokio::test]
async fn test_spawned_task_does_not_inherit_point() {
	// Arrange
	let a = point("app::Parent");

	// Act
	let (in_parent, in_child) = async {
		let child = tokio::spawn(async { current_injection_point() });
		(current_injection_point(), child.await.unwrap())
	}
	.with_injection_point(a.clone())
	.await;

	// Assert
	assert_eq!(in_parent, a);
	assert!(in_child.is_empty());
}

#[rstest]
#[tokio::test]
async fn test_produce_async_sees_point() {
	// Arrange
	let a = point("app::Greeting");
	let provider = CurrentInjectionPointProvider::new(a, || RequiredTypeProvider);

	// Act
	let value: Result<String, Infallible> =
		provider.produce_async(&CreationalContext::new()).await;

	// Assert
	assert_eq!(value, Ok("app::Greeting".to_string()));
	assert!(current_injection_point().is_empty());
}

#[rstest]
#[tokio::test]
async fn test_produce_async_resolves_delegate_with_point_installed() {
	// Arrange
	let a = point("app::Greeting");
	let expected = a.clone();
	let provider = CurrentInjectionPointProvider::new(a, move || {
		assert_eq!(current_injection_point(), expected);
		RequiredTypeProvider
	});

	// Act
	let value: Result<String, Infallible> =
		provider.produce_async(&CreationalContext::new()).await;

	// Assert
	assert!(value.is_ok());
}

#[rstest]
#[tokio::test]
async fn test_produce_async_failure_unchanged() {
	// Arrange
	let provider = CurrentInjectionPointProvider::new(point("app::Upstream"), || TimingOutProvider);

	// Act
	let result: Result<String, UpstreamTimeout> =
		provider.produce_async(&CreationalContext::new()).await;

	// Assert
	assert_eq!(result, Err(UpstreamTimeout(Duration::from_millis(250))));
	assert!(current_injection_point().is_empty());
}

#[rstest]
#[tokio::test]
async fn test_abandoned_resolution_leaves_no_point() {
	// Arrange
	let provider = CurrentInjectionPointProvider::new(point("app::Slow"), || StalledProvider);
	let ctx = CreationalContext::new();

	// Act
	let resolution = provider.produce_async::<u8, _>(&ctx);
	let outcome = tokio::time::timeout(Duration::from_millis(10), resolution).await;

	// Assert
	assert!(outcome.is_err());
	assert!(current_injection_point().is_empty());
	assert_eq!(nesting_depth(), 0);
}
