// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanning pipeline: the end-to-end document scanner and its outputs.

pub mod scanner;

pub use scanner::{Detection, DocumentScanner, ScanOutcome, ScanOutput, ScanReport};
