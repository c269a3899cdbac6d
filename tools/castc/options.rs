//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use castor::cli::{self, BaseOptions};

/// Everything `castc` was configured with.
pub struct Options {
    /// The number of functions to translate at once, `None` lets the pool decide
    pub jobs: Option<usize>,
    /// Whether to print every translated function's AST
    pub dump: bool,
    /// The options shared with every other tool
    pub base: BaseOptions,
}

pub fn parse_options() -> Options {
    let jobs = cli::jobs();
    let dump = cli::dump();
    let ((jobs, dump), base) = cli::tool_with(
        "translates JSON function descriptions into analyzable ASTs",
        "castc [--dump] [--jobs <N>] [-o <FILE>] <FILES>...",
        bpaf::construct!(jobs, dump),
    )
    .run();

    Options { jobs, dump, base }
}
