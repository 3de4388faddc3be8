// Car Lifecycle Manager - the contract itself
//
// Every operation is keyed by chassis number. Only `createCar` may run
// against a missing key; everything else needs an existing record.
// Transitions are otherwise unrestricted unless scrapping is configured
// as terminal.

use crate::car::Car;
use crate::command::Command;
use crate::config::LifecycleConfig;
use crate::error::{ContractError, ContractResult};
use crate::history::CarHistory;
use crate::ledger::LedgerStore;
use crate::stub::Stub;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct CarContract {
    lifecycle: LifecycleConfig,
}

impl Default for CarContract {
    fn default() -> Self {
        Self::new(LifecycleConfig::default())
    }
}

impl CarContract {
    pub fn new(lifecycle: LifecycleConfig) -> Self {
        CarContract { lifecycle }
    }

    pub fn lifecycle(&self) -> &LifecycleConfig {
        &self.lifecycle
    }

    /// Run one command; the returned bytes are the JSON payload.
    pub fn execute<S: LedgerStore>(
        &self,
        stub: &mut Stub<'_, S>,
        command: &Command,
    ) -> ContractResult<Vec<u8>> {
        debug!(function = command.function_name(), tx_id = stub.tx_id(), "executing");

        match command {
            Command::CreateCar { chassis_number } => self.create_car(stub, chassis_number),
            Command::TransferCar {
                chassis_number,
                new_owner,
            } => self.transfer_car(stub, chassis_number, new_owner),
            Command::SellAndRegisterCar {
                chassis_number,
                new_owner,
                registration_number,
                registration_expiry,
            } => self.sell_and_register_car(
                stub,
                chassis_number,
                new_owner,
                registration_number,
                registration_expiry,
            ),
            Command::ScrapCar { chassis_number } => self.scrap_car(stub, chassis_number),
            Command::GetCar { chassis_number } => self.get_car(stub, chassis_number),
            Command::GetCarHistory { chassis_number } => {
                self.get_car_history(stub, chassis_number)
            }
            Command::ListCars => self.list_cars(stub),
        }
    }

    pub fn create_car<S: LedgerStore>(
        &self,
        stub: &mut Stub<'_, S>,
        chassis_number: &str,
    ) -> ContractResult<Vec<u8>> {
        if stub.get_state(chassis_number)?.is_some() {
            return Err(ContractError::AlreadyExists(chassis_number.to_string()));
        }

        let car = Car::new(chassis_number.to_string(), self.lifecycle.default_owner.clone());
        save_car(stub, &car)
    }

    pub fn transfer_car<S: LedgerStore>(
        &self,
        stub: &mut Stub<'_, S>,
        chassis_number: &str,
        new_owner: &str,
    ) -> ContractResult<Vec<u8>> {
        let mut car = self.load_mutable(stub, chassis_number)?;
        car.transfer(new_owner.to_string());
        save_car(stub, &car)
    }

    pub fn sell_and_register_car<S: LedgerStore>(
        &self,
        stub: &mut Stub<'_, S>,
        chassis_number: &str,
        new_owner: &str,
        registration_number: &str,
        registration_expiry: &str,
    ) -> ContractResult<Vec<u8>> {
        let mut car = self.load_mutable(stub, chassis_number)?;
        car.sell_and_register(
            new_owner.to_string(),
            registration_number.to_string(),
            registration_expiry.to_string(),
        );
        save_car(stub, &car)
    }

    pub fn scrap_car<S: LedgerStore>(
        &self,
        stub: &mut Stub<'_, S>,
        chassis_number: &str,
    ) -> ContractResult<Vec<u8>> {
        let mut car = self.load_mutable(stub, chassis_number)?;
        car.scrap();
        save_car(stub, &car)
    }

    pub fn get_car<S: LedgerStore>(
        &self,
        stub: &Stub<'_, S>,
        chassis_number: &str,
    ) -> ContractResult<Vec<u8>> {
        stub.get_state(chassis_number)?
            .ok_or_else(|| ContractError::NotFound(chassis_number.to_string()))
    }

    pub fn get_car_history<S: LedgerStore>(
        &self,
        stub: &Stub<'_, S>,
        chassis_number: &str,
    ) -> ContractResult<Vec<u8>> {
        let modifications = stub.get_history_for_key(chassis_number)?;
        if modifications.is_empty() {
            return Err(ContractError::NotFound(chassis_number.to_string()));
        }

        let history = CarHistory::from_modifications(chassis_number, &modifications)?;
        Ok(serde_json::to_vec(&history.versions)?)
    }

    pub fn list_cars<S: LedgerStore>(&self, stub: &Stub<'_, S>) -> ContractResult<Vec<u8>> {
        let mut cars = Vec::new();
        for key in stub.keys()? {
            if let Some(bytes) = stub.get_state(&key)? {
                cars.push(Car::from_bytes(&bytes)?);
            }
        }
        Ok(serde_json::to_vec(&cars)?)
    }

    /// Load an existing car and check the scrap policy.
    fn load_mutable<S: LedgerStore>(
        &self,
        stub: &Stub<'_, S>,
        chassis_number: &str,
    ) -> ContractResult<Car> {
        let car = load_car(stub, chassis_number)?;
        if self.lifecycle.scrap_is_terminal && car.is_scrapped() {
            return Err(ContractError::Scrapped(chassis_number.to_string()));
        }
        Ok(car)
    }
}

fn load_car<S: LedgerStore>(stub: &Stub<'_, S>, chassis_number: &str) -> ContractResult<Car> {
    let bytes = stub
        .get_state(chassis_number)?
        .ok_or_else(|| ContractError::NotFound(chassis_number.to_string()))?;
    Ok(Car::from_bytes(&bytes)?)
}

fn save_car<S: LedgerStore>(stub: &mut Stub<'_, S>, car: &Car) -> ContractResult<Vec<u8>> {
    let bytes = car.to_bytes()?;
    stub.put_state(&car.chassis_number, bytes.clone());
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::car::CarStatus;
    use crate::ledger::MemoryLedger;

    fn run(
        contract: &CarContract,
        ledger: &mut MemoryLedger,
        args: &[&str],
    ) -> ContractResult<Vec<u8>> {
        let command = Command::parse(args)?;
        let (payload, write_set) = {
            let mut stub = Stub::new(&*ledger, command.function_name(), &args[1..]);
            let payload = contract.execute(&mut stub, &command)?;
            (payload, stub.into_write_set())
        };
        ledger.commit(&write_set).unwrap();
        Ok(payload)
    }

    #[test]
    fn test_create_uses_configured_owner() {
        let contract = CarContract::new(LifecycleConfig {
            default_owner: "Factory-7".to_string(),
            scrap_is_terminal: false,
        });
        let mut ledger = MemoryLedger::new();

        let car = Car::from_bytes(&run(&contract, &mut ledger, &["createCar", "1000"]).unwrap()).unwrap();

        assert_eq!(car.owner, "Factory-7");
        assert_eq!(car.status, CarStatus::Active);
    }

    #[test]
    fn test_create_twice_already_exists() {
        let contract = CarContract::default();
        let mut ledger = MemoryLedger::new();

        run(&contract, &mut ledger, &["createCar", "1000"]).unwrap();
        let err = run(&contract, &mut ledger, &["createCar", "1000"]).unwrap_err();

        assert!(matches!(err, ContractError::AlreadyExists(ref c) if c == "1000"));
    }

    #[test]
    fn test_mutations_on_missing_car_not_found() {
        let contract = CarContract::default();
        let mut ledger = MemoryLedger::new();

        for args in [
            vec!["transferCar", "9999", "Rahul"],
            vec!["sellnRegisterCar", "9999", "Vaibhav", "TS071", "31DEC2025"],
            vec!["scrapCar", "9999"],
            vec!["getCar", "9999"],
            vec!["getCarHistory", "9999"],
        ] {
            let err = run(&contract, &mut ledger, &args).unwrap_err();
            assert!(matches!(err, ContractError::NotFound(_)), "{:?}", args);
        }
    }

    #[test]
    fn test_terminal_scrap_blocks_mutations() {
        let contract = CarContract::new(LifecycleConfig {
            scrap_is_terminal: true,
            ..LifecycleConfig::default()
        });
        let mut ledger = MemoryLedger::new();

        run(&contract, &mut ledger, &["createCar", "1000"]).unwrap();
        run(&contract, &mut ledger, &["scrapCar", "1000"]).unwrap();

        let err = run(&contract, &mut ledger, &["transferCar", "1000", "Jyothi"]).unwrap_err();
        assert!(matches!(err, ContractError::Scrapped(_)));

        // reads still work
        let car = Car::from_bytes(&run(&contract, &mut ledger, &["getCar", "1000"]).unwrap()).unwrap();
        assert_eq!(car.status, CarStatus::Scrapped);
    }

    #[test]
    fn test_list_cars_sorted_by_chassis() {
        let contract = CarContract::default();
        let mut ledger = MemoryLedger::new();

        run(&contract, &mut ledger, &["createCar", "2000"]).unwrap();
        run(&contract, &mut ledger, &["createCar", "1000"]).unwrap();

        let cars: Vec<Car> =
            serde_json::from_slice(&run(&contract, &mut ledger, &["listCars"]).unwrap()).unwrap();
        let chassis: Vec<&str> = cars.iter().map(|c| c.chassis_number.as_str()).collect();

        assert_eq!(chassis, vec!["1000", "2000"]);
    }
}
