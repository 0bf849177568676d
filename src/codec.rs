//! JSON-shaped encode/decode entry points.
//!
//! Nodes and results are polymorphic on their `type` field. These functions are the
//! only way the navigation core exchanges data with storage or transport.

use crate::error::DecodeError;
use crate::node::{Assessment, Node};
use crate::result::ResultData;
use serde::Deserialize;
use serde_json::Value;

pub fn decode_node(json: &Value) -> Result<Node, DecodeError> {
    Ok(Node::deserialize(json)?)
}

pub fn encode_node(node: &Node) -> Result<Value, DecodeError> {
    Ok(serde_json::to_value(node)?)
}

pub fn decode_result(json: &Value) -> Result<ResultData, DecodeError> {
    Ok(ResultData::deserialize(json)?)
}

pub fn encode_result(result: &ResultData) -> Result<Value, DecodeError> {
    Ok(serde_json::to_value(result)?)
}

pub fn decode_assessment(json: &Value) -> Result<Assessment, DecodeError> {
    Ok(Assessment::deserialize(json)?)
}

pub fn encode_assessment(assessment: &Assessment) -> Result<Value, DecodeError> {
    Ok(serde_json::to_value(assessment)?)
}
