#[cfg(test)]
mod tests {
    use crate::controller::tests::common::{controller_with, FakeTransport};
    use crate::controller::DetailStatus;
    use crate::errors::ErrorKind;
    use crate::orchestrator::RequestState;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use std::time::Duration;

    fn detail_body(id: u32, name: &str, type_name: &str) -> Value {
        json!({
            "id": id,
            "name": name,
            "height": 4,
            "weight": 60,
            "sprites": { "front_default": format!("https://img.test/{}.png", id) },
            "types": [{ "slot": 1, "type": { "name": type_name } }],
            "stats": [
                { "base_stat": 35, "stat": { "name": "hp" } },
                { "base_stat": 90, "stat": { "name": "speed" } }
            ],
            "abilities": [{ "ability": { "name": "static" } }]
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_detail_loads_and_closes() {
        let fake = FakeTransport::new();
        fake.respond_json("/pokemon/25", detail_body(25, "pikachu", "electric"));
        let mut controller = controller_with(&fake);

        assert_eq!(controller.detail_view().status, DetailStatus::Closed);
        controller.open_detail(25);
        assert_eq!(controller.detail_view().status, DetailStatus::Loading);
        controller.settle().await;

        let view = controller.detail_view();
        assert_eq!(view.id, Some(25));
        match view.status {
            DetailStatus::Ready(detail) => {
                assert_eq!(detail.name, "pikachu");
                assert_eq!(detail.types, vec!["electric"]);
                assert_eq!(detail.stats[1].base_stat, 90);
                assert_eq!(detail.height, Some(4));
            }
            other => panic!("expected a loaded detail, got {:?}", other),
        }
        assert!(!view.show_retry);

        controller.close_detail();
        assert_eq!(controller.detail_view().status, DetailStatus::Closed);
        assert_eq!(controller.detail_view().id, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_id_is_not_found_without_retry() {
        let fake = FakeTransport::new();
        let mut controller = controller_with(&fake);

        controller.open_detail(9999);
        controller.settle().await;

        let view = controller.detail_view();
        match &view.status {
            DetailStatus::Error(info) => {
                assert_eq!(info.message, "Pokemon with ID 9999 not found.");
                assert_eq!(info.kind, ErrorKind::NotFound);
            }
            other => panic!("expected not found, got {:?}", other),
        }
        assert!(!view.show_retry);
    }

    #[tokio::test(start_paused = true)]
    async fn test_server_error_can_be_retried() {
        let fake = FakeTransport::new();
        fake.respond("/pokemon/7", 500, r#"{"detail":"boom"}"#);
        let mut controller = controller_with(&fake);

        controller.open_detail(7);
        controller.settle().await;
        let view = controller.detail_view();
        assert!(matches!(&view.status, DetailStatus::Error(info) if info.message == "API error: 500"));
        assert!(view.show_retry);

        fake.respond_json("/pokemon/7", detail_body(7, "squirtle", "water"));
        assert!(controller.retry_detail());
        controller.settle().await;
        assert!(matches!(controller.detail_view().status, DetailStatus::Ready(d) if d.name == "squirtle"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_without_open_detail_does_nothing() {
        let fake = FakeTransport::new();
        let mut controller = controller_with(&fake);
        assert!(!controller.retry_detail());
        assert!(fake.requests().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_detail_supersedes_older() {
        let fake = FakeTransport::new();
        fake.respond_after("/pokemon/1", Duration::from_millis(100), 200, detail_body(1, "bulbasaur", "grass"));
        fake.respond_json("/pokemon/4", detail_body(4, "charmander", "fire"));
        let mut controller = controller_with(&fake);

        controller.open_detail(1);
        controller.open_detail(4);
        controller.settle().await;

        let view = controller.detail_view();
        assert_eq!(view.id, Some(4));
        assert!(matches!(view.status, DetailStatus::Ready(d) if d.name == "charmander"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_closing_drops_in_flight_detail() {
        let fake = FakeTransport::new();
        fake.respond_after("/pokemon/1", Duration::from_millis(100), 200, detail_body(1, "bulbasaur", "grass"));
        let mut controller = controller_with(&fake);

        controller.open_detail(1);
        controller.close_detail();
        controller.settle().await;

        assert_eq!(controller.detail_view().status, DetailStatus::Closed);
        assert!(!controller.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn test_type_options_after_start() {
        let fake = FakeTransport::new();
        let mut controller = controller_with(&fake);
        assert!(controller.type_options().is_empty());

        controller.start();
        controller.settle().await;
        assert_eq!(controller.type_options(), ["grass", "poison", "fire", "electric"]);
        assert!(matches!(controller.types_state(), RequestState::Success(_)));
    }
}
