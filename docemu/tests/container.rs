//! Integration tests for the in-memory container through the public facade.

mod common;

use common::{Person, Pet};
use docemu::{
    memory::{InMemoryClient, InMemoryContainer},
    prelude::*,
};

async fn persons() -> InMemoryContainer {
    let client = InMemoryClient::builder().build().await.unwrap();
    client.container("people", "persons").unwrap()
}

#[tokio::test]
async fn test_create_twice_conflicts() {
    let container = persons().await;
    let person = Person::new("foo", "Foo", "Bar");

    let first = container.create(person.clone(), None).await.unwrap();
    assert_eq!(first.status_code(), StatusCode::Created);
    assert_eq!(first.into_resource(), Some(person.clone()));

    let second = container.create(person, None).await.unwrap();
    assert_eq!(second.status_code(), StatusCode::Conflict);
    assert_eq!(second.resource(), None);
}

#[tokio::test]
async fn test_upsert_then_read() {
    let container = persons().await;

    let upserted = container.upsert(Person::new("foo", "Foo", "Bar"), None).await.unwrap();
    assert_eq!(upserted.status_code(), StatusCode::Ok);

    let read = container.read::<Person>("foo", PartitionKey::None).await.unwrap();
    assert_eq!(read.status_code(), StatusCode::Ok);

    let person = read.into_resource().unwrap();
    assert_eq!(person.first_name, "Foo");
    assert_eq!(person.last_name, "Bar");
}

#[tokio::test]
async fn test_upsert_converges_on_last_write() {
    let container = persons().await;

    for last_name in ["Bar", "Baz", "Buzz"] {
        container.upsert(Person::new("foo", "Foo", last_name), None).await.unwrap();
    }

    let read = container.read::<Person>("foo", PartitionKey::None).await.unwrap();
    assert_eq!(read.into_resource(), Some(Person::new("foo", "Foo", "Buzz")));
    assert_eq!(container.query::<Person>().len(), 1);
}

#[tokio::test]
async fn test_delete_then_delete_again() {
    let container = persons().await;
    let person = Person::new("foo", "Foo", "Bar");
    container.create(person.clone(), None).await.unwrap();

    let read = container.read::<Person>("foo", PartitionKey::None).await.unwrap();
    assert_eq!(read.resource(), Some(&person));

    let deleted = container.delete::<Person>("foo", PartitionKey::None).await.unwrap();
    assert_eq!(deleted.status_code(), StatusCode::NoContent);
    assert_eq!(deleted.into_resource(), Some(person));

    let after = container.read::<Person>("foo", PartitionKey::None).await.unwrap();
    assert_eq!(after.status_code(), StatusCode::NotFound);

    let again = container.delete::<Person>("foo", PartitionKey::None).await.unwrap();
    assert_eq!(again.status_code(), StatusCode::NotFound);
}

#[tokio::test]
async fn test_replace_missing_is_not_found() {
    let container = persons().await;

    let replaced = container
        .replace(Person::new("foo", "Foo", "Buzz"), "foo", Some("foo".into()))
        .await
        .unwrap();
    assert_eq!(replaced.status_code(), StatusCode::NotFound);

    let read = container.read::<Person>("foo", PartitionKey::None).await.unwrap();
    assert_eq!(read.status_code(), StatusCode::NotFound);
}

#[tokio::test]
async fn test_delete_with_wrong_type_leaves_item() {
    let container = persons().await;
    container.create(Pet { id: "rex".into(), owner: None }, None).await.unwrap();

    let deleted = container.delete::<Person>("rex", PartitionKey::None).await.unwrap();
    assert_eq!(deleted.status_code(), StatusCode::NotFound);

    let read = container.read::<Pet>("rex", PartitionKey::None).await.unwrap();
    assert_eq!(read.status_code(), StatusCode::Ok);
}

#[tokio::test]
async fn test_query_returns_only_requested_type() {
    let container = persons().await;

    container.create(Person::new("a", "Ada", "Lovelace"), None).await.unwrap();
    container.create(Person::new("b", "Alan", "Turing"), None).await.unwrap();
    container.create(Person::new("c", "Grace", "Hopper"), None).await.unwrap();
    container.create(Pet { id: "d".into(), owner: Some("a".into()) }, None).await.unwrap();

    let snapshot = container.query::<Person>();
    assert_eq!(snapshot.len(), 3);

    let mut feed = FeedIteratorFactory::SinglePage.feed_iterator(snapshot);
    assert!(feed.has_more_results());

    let page = feed.read_next().await.unwrap();
    assert_eq!(page.count(), 3);
    assert!(!feed.has_more_results());

    let mut ids = page.iter().map(|p| p.id.clone()).collect::<Vec<_>>();
    ids.sort();
    assert_eq!(ids, vec!["a", "b", "c"]);

    assert!(matches!(feed.read_next().await, Err(EmulatorError::FeedExhausted)));
}

#[tokio::test]
async fn test_query_snapshot_ignores_later_writes() {
    let container = persons().await;
    container.create(Person::new("a", "Ada", "Lovelace"), None).await.unwrap();

    let snapshot = container.query::<Person>();
    container.create(Person::new("b", "Alan", "Turing"), None).await.unwrap();

    assert_eq!(snapshot.len(), 1);
    assert_eq!(container.query::<Person>().len(), 2);
}

#[tokio::test]
async fn test_create_without_identifier_generates_key() {
    let container = persons().await;

    let created = container.create(Person::new("", "No", "Id"), None).await.unwrap();
    assert_eq!(created.status_code(), StatusCode::Created);

    let again = container.create(Person::new("", "No", "Id"), None).await.unwrap();
    assert_eq!(again.status_code(), StatusCode::Created);

    assert_eq!(container.query::<Person>().len(), 2);
    assert!(!container.store().contains_key(""));
}

#[tokio::test]
async fn test_concurrent_creates_have_single_winner() {
    let container = persons().await;

    let handles = (0..8)
        .map(|n| {
            let container = container.clone();
            tokio::spawn(async move {
                container
                    .create(Person::new("contended", &n.to_string(), "Racer"), None)
                    .await
                    .unwrap()
                    .status_code()
            })
        })
        .collect::<Vec<_>>();

    let mut created = 0;
    for handle in handles {
        if handle.await.unwrap() == StatusCode::Created {
            created += 1;
        }
    }

    assert_eq!(created, 1);
    assert_eq!(container.query::<Person>().len(), 1);
}

#[tokio::test]
async fn test_json_items_share_the_container() {
    let container = persons().await;

    container
        .create(docemu::serde_json::json!({ "id": "doc", "kind": "raw" }), None)
        .await
        .unwrap();

    let read = container
        .read::<docemu::serde_json::Value>("doc", PartitionKey::None)
        .await
        .unwrap();
    assert_eq!(read.into_resource().unwrap()["kind"], "raw");
    assert_eq!(container.query::<Person>().len(), 0);
}

/// A repository written only against the container traits.
struct PersonRepository<C: ItemContainer> {
    container: C,
    feeds: FeedIteratorFactory,
}

impl<C: ItemContainer> PersonRepository<C> {
    fn new<F>(factory: &F, feeds: FeedIteratorFactory) -> EmulatorResult<Self>
    where
        F: ContainerFactory<Container = C>,
    {
        Ok(Self { container: factory.container("people", "persons")?, feeds })
    }

    async fn add(&self, person: Person) -> EmulatorResult<bool> {
        let response = self.container.create(person, None).await?;
        Ok(response.status_code() == StatusCode::Created)
    }

    async fn with_last_name(&self, last_name: &str) -> EmulatorResult<Vec<Person>> {
        let query = self.container
            .query::<Person>()
            .filter(|p| p.last_name == last_name)
            .sort_by_key(|p| p.first_name.clone());

        let mut feed = self.feeds.feed_iterator(query);
        let mut found = Vec::new();

        while feed.has_more_results() {
            found.extend(feed.read_next().await?);
        }

        Ok(found)
    }
}

#[tokio::test]
async fn test_repository_against_factory() {
    let client = InMemoryClient::builder().build().await.unwrap();

    for feeds in [FeedIteratorFactory::SinglePage, FeedIteratorFactory::paged(1).unwrap()] {
        let repository = PersonRepository::new(&client, feeds).unwrap();
        repository.add(Person::new("1", "Zoe", "Smith")).await.unwrap();
        repository.add(Person::new("2", "Adam", "Smith")).await.unwrap();
        repository.add(Person::new("3", "Eve", "Jones")).await.unwrap();

        let smiths = repository.with_last_name("Smith").await.unwrap();
        assert_eq!(
            smiths.iter().map(|p| p.first_name.as_str()).collect::<Vec<_>>(),
            vec!["Adam", "Zoe"]
        );
    }

    assert_eq!(client.container_count(), 1);
}

#[tokio::test]
async fn test_unsupported_operations_are_errors() {
    let container = persons().await;

    assert_eq!(
        container.patch::<Person>("foo", PartitionKey::None, vec![]).await.unwrap_err(),
        EmulatorError::Unsupported("patch".into())
    );
    assert!(matches!(
        container.read_item_stream("foo", PartitionKey::None).await,
        Err(EmulatorError::Unsupported(_))
    ));
    assert!(matches!(container.feed_ranges().await, Err(EmulatorError::Unsupported(_))));
    assert!(matches!(container.replace_throughput(400).await, Err(EmulatorError::Unsupported(_))));
}
