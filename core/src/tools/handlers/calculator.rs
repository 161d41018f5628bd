use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::tools::context::{ToolCallError, ToolContext, ToolInvocation};
use crate::tools::registry::ToolHandler;

#[derive(Debug, Deserialize)]
struct BinaryArgs {
  a: f64,
  b: f64,
}

pub struct AddHandler;

#[async_trait]
impl ToolHandler for AddHandler {
  async fn handle(
    &self,
    invocation: ToolInvocation,
    _ctx: &ToolContext,
  ) -> Result<Value, ToolCallError> {
    let args: BinaryArgs = invocation.parse_arguments()?;
    Ok(json!(args.a + args.b))
  }
}

pub struct SubtractHandler;

#[async_trait]
impl ToolHandler for SubtractHandler {
  async fn handle(
    &self,
    invocation: ToolInvocation,
    _ctx: &ToolContext,
  ) -> Result<Value, ToolCallError> {
    let args: BinaryArgs = invocation.parse_arguments()?;
    Ok(json!(args.a - args.b))
  }
}

pub struct MultiplyHandler;

#[async_trait]
impl ToolHandler for MultiplyHandler {
  async fn handle(
    &self,
    invocation: ToolInvocation,
    _ctx: &ToolContext,
  ) -> Result<Value, ToolCallError> {
    let args: BinaryArgs = invocation.parse_arguments()?;
    Ok(json!(args.a * args.b))
  }
}

pub struct DivideHandler;

#[async_trait]
impl ToolHandler for DivideHandler {
  async fn handle(
    &self,
    invocation: ToolInvocation,
    _ctx: &ToolContext,
  ) -> Result<Value, ToolCallError> {
    let args: BinaryArgs = invocation.parse_arguments()?;
    if args.b == 0.0 {
      return Err(ToolCallError::Domain("division by zero".to_string()));
    }
    Ok(json!(args.a / args.b))
  }
}
