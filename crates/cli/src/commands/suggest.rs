use rentwise_core::ValuationRuntime;

use super::{engine_for, CommandResult, InputError, LoadedConfig, RoomArgs};

pub fn run(loaded: &LoadedConfig, room: &RoomArgs) -> CommandResult {
    let engine = match engine_for("suggest", loaded) {
        Ok(engine) => engine,
        Err(result) => return result,
    };

    let features = match room.features() {
        Ok(features) => features,
        Err(error) => return error.into_result("suggest"),
    };

    match engine.suggested_price(&features) {
        Ok(tiers) => CommandResult::success("suggest", tiers),
        Err(error) => InputError::Invalid(error.into()).into_result("suggest"),
    }
}
