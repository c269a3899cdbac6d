//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

mod display;
mod driver;
mod options;

use crate::driver::driver;
use crate::options::parse_options;
use std::process::ExitCode;

fn main() -> ExitCode {
    #[cfg(windows)]
    let _ = ansi_term::enable_ansi_support();

    let options = parse_options();

    match driver(&options) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            display::print_error("unable to write output", &e);

            ExitCode::from(2)
        }
    }
}
