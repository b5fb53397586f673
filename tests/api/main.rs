mod call_flow;
mod health_check;
mod helpers;
