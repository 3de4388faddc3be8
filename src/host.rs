// Chaincode host - runs one invocation per call with begin / commit / rollback
//
// This plays the part the ledger peer (or its mock stub) plays for a real
// contract: parse the invocation, hand the contract a transaction stub,
// commit the buffered writes on success and drop them on failure.

use crate::car::Car;
use crate::command::{self, Command};
use crate::config::LifecycleConfig;
use crate::contract::CarContract;
use crate::db::Event;
use crate::error::{ContractError, ContractResult, Response};
use crate::history::CarHistory;
use crate::ledger::{LedgerStore, WriteSet};
use crate::stub::Stub;
use tracing::{info, warn};

pub const DEFAULT_ACTOR: &str = "vlm";

pub struct ChaincodeHost<S: LedgerStore> {
    contract: CarContract,
    store: S,
    actor: String,
}

impl<S: LedgerStore> ChaincodeHost<S> {
    pub fn new(store: S, lifecycle: LifecycleConfig) -> Self {
        ChaincodeHost {
            contract: CarContract::new(lifecycle),
            store,
            actor: DEFAULT_ACTOR.to_string(),
        }
    }

    /// Actor recorded on audit events.
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = actor.into();
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn contract(&self) -> &CarContract {
        &self.contract
    }

    /// Invoke `[function, args...]` and return the response envelope.
    pub fn invoke<A: AsRef<str>>(&mut self, invocation: &[A]) -> Response {
        match self.try_invoke(invocation) {
            Ok(payload) => Response::success(payload),
            Err(err) => {
                warn!(error = %err, status = err.status(), "invocation failed");
                Response::error(&err)
            }
        }
    }

    /// Same as `invoke`, tagged with a caller-chosen label for the logs.
    pub fn mock_invoke<A: AsRef<str>>(&mut self, tx_label: &str, invocation: &[A]) -> Response {
        info!(tx_label, "mock invoke");
        self.invoke(invocation)
    }

    fn try_invoke<A: AsRef<str>>(&mut self, invocation: &[A]) -> ContractResult<Vec<u8>> {
        let command = Command::parse(invocation)?;
        let args: Vec<&str> = invocation[1..].iter().map(|a| a.as_ref()).collect();

        let (payload, write_set) = {
            let mut stub = Stub::new(&self.store, command.function_name(), &args);
            let payload = self.contract.execute(&mut stub, &command)?;
            (payload, stub.into_write_set())
        };

        if command.is_read_only() || write_set.is_empty() {
            return Ok(payload);
        }

        self.store.commit(&write_set)?;
        info!(
            function = command.function_name(),
            tx_id = %write_set.tx_id,
            writes = write_set.writes.len(),
            "committed"
        );
        self.audit(&command, &args, &write_set);

        Ok(payload)
    }

    fn audit(&mut self, command: &Command, args: &[&str], write_set: &WriteSet) {
        let event = Event::new(
            command.function_name(),
            "car",
            command.chassis_number().unwrap_or_default(),
            serde_json::json!({
                "txId": write_set.tx_id,
                "args": args,
            }),
            &self.actor,
        );

        // The write is already committed; a lost audit row is logged, not fatal.
        if let Err(e) = self.store.record_event(&event) {
            warn!(error = %e, tx_id = %write_set.tx_id, "failed to record audit event");
        }
    }

    /// Raw world-state read, bypassing the contract.
    pub fn get_state(&self, key: &str) -> anyhow::Result<Option<Vec<u8>>> {
        self.store.get_state(key)
    }

    // ========================================================================
    // Typed read helpers (all go through the contract)
    // ========================================================================

    pub fn car(&mut self, chassis_number: &str) -> ContractResult<Car> {
        let payload = self.try_invoke(&[command::GET_CAR, chassis_number])?;
        Ok(Car::from_bytes(&payload)?)
    }

    pub fn history(&mut self, chassis_number: &str) -> ContractResult<CarHistory> {
        let payload = self.try_invoke(&[command::GET_CAR_HISTORY, chassis_number])?;
        Ok(CarHistory::from_payload(chassis_number, &payload)?)
    }

    pub fn cars(&mut self) -> ContractResult<Vec<Car>> {
        let payload = self.try_invoke(&[command::LIST_CARS])?;
        Ok(serde_json::from_slice(&payload)?)
    }

    pub fn events(&self, chassis_number: &str) -> ContractResult<Vec<Event>> {
        self.store
            .events_for_entity("car", chassis_number)
            .map_err(ContractError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::car::CarStatus;
    use crate::error;
    use crate::ledger::MemoryLedger;

    fn host() -> ChaincodeHost<MemoryLedger> {
        ChaincodeHost::new(MemoryLedger::new(), LifecycleConfig::default()).with_actor("tester")
    }

    #[test]
    fn test_success_commits_and_audits() {
        let mut host = host();

        let response = host.mock_invoke("001", &["createCar", "1000"]);
        assert!(response.is_ok(), "{}", response.message);

        assert!(host.get_state("1000").unwrap().is_some());

        let events = host.events("1000").unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, "createCar");
        assert_eq!(events[0].actor, "tester");
        assert_eq!(events[0].data["args"][0], "1000");
    }

    #[test]
    fn test_failure_leaves_store_untouched() {
        let mut host = host();
        host.invoke(&["createCar", "1000"]);

        let response = host.invoke(&["createCar", "1000"]);
        assert_eq!(response.status, error::CONFLICT);
        assert!(response.message.contains("already exists"));

        assert_eq!(host.history("1000").unwrap().version_count(), 1);
        assert_eq!(host.events("1000").unwrap().len(), 1);
    }

    #[test]
    fn test_reads_do_not_write() {
        let mut host = host();
        host.invoke(&["createCar", "1000"]);

        for _ in 0..3 {
            assert!(host.invoke(&["getCar", "1000"]).is_ok());
        }
        assert!(host.invoke(&["getCarHistory", "1000"]).is_ok());

        assert_eq!(host.history("1000").unwrap().version_count(), 1);
        assert_eq!(host.events("1000").unwrap().len(), 1);
    }

    #[test]
    fn test_bad_invocation_is_400() {
        let mut host = host();

        assert_eq!(host.invoke(&["createCar"]).status, error::BAD_REQUEST);
        assert_eq!(host.invoke(&["paintCar", "1000", "red"]).status, error::BAD_REQUEST);

        let empty: [&str; 0] = [];
        assert_eq!(host.invoke(&empty).status, error::BAD_REQUEST);
    }

    #[test]
    fn test_typed_helpers() {
        let mut host = host();
        host.invoke(&["createCar", "1000"]);
        host.invoke(&["transferCar", "1000", "Rahul"]);

        let car = host.car("1000").unwrap();
        assert_eq!(car.owner, "Rahul");
        assert_eq!(car.status, CarStatus::Sold);

        assert_eq!(host.cars().unwrap().len(), 1);
        assert!(matches!(host.car("2000"), Err(ContractError::NotFound(_))));
    }
}
