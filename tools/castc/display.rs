//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use castor::entity::EntityInfo;
use castor::translate::TranslationFailure;
use ansi_term::Color::{Blue, Cyan, Green, Red, White};
use std::fmt::Display;
use std::path::Path;

pub fn print_error(context: &str, error: &dyn Display) {
    eprintln!("{} {context}: {error}", Red.bold().paint("error:"));
}

pub fn print_file_error(file: &Path, error: &dyn Display) {
    let file = White.bold().paint(file.display().to_string());

    eprintln!("{} {file}: {error}", Red.bold().paint("error:"));
}

pub fn print_failure(file: &Path, failure: &TranslationFailure) {
    let file = Cyan.paint(file.display().to_string());
    let function = Blue.bold().paint(&failure.function);

    eprintln!(
        "{} {file}: translation failed for function {function}: {}",
        Red.bold().paint("error:"),
        failure.error
    );
}

pub fn print_translated(file: &Path, info: &EntityInfo) {
    let file = Cyan.paint(file.display().to_string());
    let function = Blue.bold().paint(info.function_name());
    let blocks = info.basic_blocks().len();
    let calls = info.call_sites().len();

    eprintln!(
        "  {} {file}: {function} ({blocks} blocks, {calls} calls)",
        Green.paint("translated")
    );
}

pub fn print_summary(translated: usize, failed: usize) {
    let switching_color = if failed == 0 { Green } else { Red };
    let summary = switching_color.bold().paint("Summary");
    let translated = Green.paint(format!("{translated}"));
    let failed = switching_color.paint(format!("{failed}"));

    eprintln!("     {summary} {translated} functions translated, {failed} failed");
}
