//! Expression template and the stdout framing used to talk to the kernel.

use std::io::BufRead;

use lv_core::{ModelParams, T_END, T_START, T_STEP};
use serde_json::Value;
use tracing::warn;

use crate::{KernelError, KernelResult};

pub const BEGIN_MARKER: &str = "<<lvsim:begin>>";
pub const END_MARKER: &str = "<<lvsim:end>>";

/// NDSolve of the predator–prey pair over `[T_START, T_END]`, tabulated at
/// `T_STEP` as `{t, x(t), y(t)}` rows.
pub fn lotka_volterra_expression(params: &ModelParams) -> String {
    format!(
        "Module[{{sol = NDSolve[{{\
         x'[t] == {alpha}*x[t] - {beta}*x[t]*y[t], \
         y'[t] == {delta}*x[t]*y[t] - {gamma}*y[t], \
         x[0] == {x0}, y[0] == {y0}}}, {{x, y}}, {{t, {t0}, {t1}}}]}}, \
         Table[{{t, x[t] /. sol[[1]], y[t] /. sol[[1]]}}, {{t, {t0}, {t1}, {dt}}}]]",
        alpha = literal(params.alpha),
        beta = literal(params.beta),
        gamma = literal(params.gamma),
        delta = literal(params.delta),
        x0 = literal(params.x0),
        y0 = literal(params.y0),
        t0 = T_START,
        t1 = T_END,
        dt = T_STEP,
    )
}

fn literal(value: f64) -> String {
    format!("({})", value)
}

/// One input line asking the kernel to print `expression` as JSON between
/// the markers.
pub fn request_line(expression: &str) -> String {
    let single_line = expression.replace(['\r', '\n'], " ");
    format!(
        "WriteString[\"stdout\", \"\\n{BEGIN_MARKER}\\n\", \
         ExportString[{single_line}, \"JSON\", \"Compact\" -> True], \
         \"\\n{END_MARKER}\\n\"]\n"
    )
}

/// Read kernel output up to the end marker and decode the framed payload.
/// Lines before the begin marker are kernel messages and only logged.
pub fn read_framed_response<R: BufRead>(reader: &mut R) -> KernelResult<Value> {
    let mut line = String::new();
    let mut payload: Option<String> = None;

    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Err(KernelError::Terminated);
        }
        let trimmed = line.trim();

        match payload.as_mut() {
            None if trimmed == BEGIN_MARKER => payload = Some(String::new()),
            None => {
                if !trimmed.is_empty() {
                    warn!(output = trimmed, "kernel message");
                }
            }
            Some(_) if trimmed == END_MARKER => break,
            Some(body) => body.push_str(trimmed),
        }
    }

    let payload = payload.unwrap_or_default();
    serde_json::from_str(&payload).map_err(|source| KernelError::Response { payload, source })
}
