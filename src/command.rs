// Command - an invocation (function name + string args) parsed once at the boundary

use crate::error::{ContractError, ContractResult};
use chrono::NaiveDate;

pub const CREATE_CAR: &str = "createCar";
pub const TRANSFER_CAR: &str = "transferCar";
pub const SELL_AND_REGISTER_CAR: &str = "sellnRegisterCar";
pub const SCRAP_CAR: &str = "scrapCar";
pub const GET_CAR: &str = "getCar";
pub const GET_CAR_HISTORY: &str = "getCarHistory";
pub const LIST_CARS: &str = "listCars";

/// Every function name the contract answers to.
pub const FUNCTIONS: [&str; 7] = [
    CREATE_CAR,
    TRANSFER_CAR,
    SELL_AND_REGISTER_CAR,
    SCRAP_CAR,
    GET_CAR,
    GET_CAR_HISTORY,
    LIST_CARS,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    CreateCar {
        chassis_number: String,
    },
    TransferCar {
        chassis_number: String,
        new_owner: String,
    },
    SellAndRegisterCar {
        chassis_number: String,
        new_owner: String,
        registration_number: String,
        registration_expiry: String,
    },
    ScrapCar {
        chassis_number: String,
    },
    GetCar {
        chassis_number: String,
    },
    GetCarHistory {
        chassis_number: String,
    },
    ListCars,
}

impl Command {
    /// Parse `[function, args...]`.
    pub fn parse<A: AsRef<str>>(invocation: &[A]) -> ContractResult<Command> {
        let (function, args) = invocation
            .split_first()
            .ok_or_else(|| ContractError::invalid("missing function name"))?;
        let args: Vec<&str> = args.iter().map(|a| a.as_ref()).collect();
        Self::from_parts(function.as_ref(), &args)
    }

    pub fn from_parts(function: &str, args: &[&str]) -> ContractResult<Command> {
        let command = match function {
            CREATE_CAR => {
                let [chassis] = expect_args::<1>(function, args)?;
                Command::CreateCar {
                    chassis_number: non_empty("chassis number", chassis)?,
                }
            }
            TRANSFER_CAR => {
                let [chassis, owner] = expect_args::<2>(function, args)?;
                Command::TransferCar {
                    chassis_number: non_empty("chassis number", chassis)?,
                    new_owner: non_empty("owner", owner)?,
                }
            }
            SELL_AND_REGISTER_CAR => {
                let [chassis, owner, registration, expiry] = expect_args::<4>(function, args)?;
                if parse_registration_expiry(expiry).is_none() {
                    return Err(ContractError::invalid(format!(
                        "registration expiry '{}' is not a date (expected e.g. 31DEC2025 or 2025-12-31)",
                        expiry
                    )));
                }
                Command::SellAndRegisterCar {
                    chassis_number: non_empty("chassis number", chassis)?,
                    new_owner: non_empty("owner", owner)?,
                    registration_number: non_empty("registration number", registration)?,
                    registration_expiry: expiry.to_string(),
                }
            }
            SCRAP_CAR => {
                let [chassis] = expect_args::<1>(function, args)?;
                Command::ScrapCar {
                    chassis_number: non_empty("chassis number", chassis)?,
                }
            }
            GET_CAR => {
                let [chassis] = expect_args::<1>(function, args)?;
                Command::GetCar {
                    chassis_number: non_empty("chassis number", chassis)?,
                }
            }
            GET_CAR_HISTORY => {
                let [chassis] = expect_args::<1>(function, args)?;
                Command::GetCarHistory {
                    chassis_number: non_empty("chassis number", chassis)?,
                }
            }
            LIST_CARS => {
                expect_args::<0>(function, args)?;
                Command::ListCars
            }
            other => {
                return Err(ContractError::invalid(format!(
                    "unknown function '{}', expected one of: {}",
                    other,
                    FUNCTIONS.join(", ")
                )))
            }
        };

        Ok(command)
    }

    pub fn function_name(&self) -> &'static str {
        match self {
            Command::CreateCar { .. } => CREATE_CAR,
            Command::TransferCar { .. } => TRANSFER_CAR,
            Command::SellAndRegisterCar { .. } => SELL_AND_REGISTER_CAR,
            Command::ScrapCar { .. } => SCRAP_CAR,
            Command::GetCar { .. } => GET_CAR,
            Command::GetCarHistory { .. } => GET_CAR_HISTORY,
            Command::ListCars => LIST_CARS,
        }
    }

    pub fn chassis_number(&self) -> Option<&str> {
        match self {
            Command::CreateCar { chassis_number }
            | Command::TransferCar { chassis_number, .. }
            | Command::SellAndRegisterCar { chassis_number, .. }
            | Command::ScrapCar { chassis_number }
            | Command::GetCar { chassis_number }
            | Command::GetCarHistory { chassis_number } => Some(chassis_number),
            Command::ListCars => None,
        }
    }

    pub fn is_read_only(&self) -> bool {
        matches!(
            self,
            Command::GetCar { .. } | Command::GetCarHistory { .. } | Command::ListCars
        )
    }
}

fn expect_args<'a, const N: usize>(function: &str, args: &[&'a str]) -> ContractResult<[&'a str; N]> {
    <[&str; N]>::try_from(args).map_err(|_| {
        ContractError::invalid(format!(
            "{} expects {} argument(s), got {}",
            function,
            N,
            args.len()
        ))
    })
}

fn non_empty(field: &str, value: &str) -> ContractResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ContractError::invalid(format!("{} must not be empty", field)));
    }
    Ok(trimmed.to_string())
}

/// Accepts `31DEC2025` (month name, any case) or ISO `2025-12-31`.
pub fn parse_registration_expiry(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%d%b%Y")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .ok()
}
