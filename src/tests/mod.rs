mod public_flow;
mod report_flow;
mod support;
