use rentwise_core::{BaseEstimate, PricePrediction, ValuationRuntime};
use serde::Serialize;

use super::{engine_for, CommandResult, InputError, LoadedConfig, RoomArgs};

#[derive(Debug, Serialize)]
struct PredictOutput {
    prediction: PricePrediction,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace: Option<BaseEstimate>,
}

pub fn run(loaded: &LoadedConfig, room: &RoomArgs, with_trace: bool) -> CommandResult {
    let engine = match engine_for("predict", loaded) {
        Ok(engine) => engine,
        Err(result) => return result,
    };

    let features = match room.features() {
        Ok(features) => features,
        Err(error) => return error.into_result("predict"),
    };

    let prediction = match engine.predict_price(&features) {
        Ok(prediction) => prediction,
        Err(error) => return InputError::Invalid(error.into()).into_result("predict"),
    };
    let trace = if with_trace {
        match engine.base_estimate(&features) {
            Ok(estimate) => Some(estimate),
            Err(error) => return InputError::Invalid(error.into()).into_result("predict"),
        }
    } else {
        None
    };

    CommandResult::success("predict", PredictOutput { prediction, trace })
}
