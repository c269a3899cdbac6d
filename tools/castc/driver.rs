//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::display;
use crate::options::Options;
use castor::ast::AstWriter;
use castor::entity::{EntityConsumer, EntityInfo, EntityTable};
use castor::transfer::RawEntityInfo;
use castor::translate::TranslationFailure;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::mpsc;
use thiserror::Error;
use threadpool::ThreadPool;

#[derive(Error, Debug)]
pub enum ReadError {
    #[error("unable to read file: {0}")]
    Io(#[from] io::Error),
    #[error("not a valid unit: {0}")]
    Json(#[from] serde_json::Error),
}

/// Translates every input, returning whether every function in every input
/// translated. Only failing to write output is an `Err`.
pub fn driver(options: &Options) -> io::Result<bool> {
    let pool = pool_for_jobs(options.jobs);
    let mut out: Box<dyn Write> = match &options.base.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    };

    let mut translated = 0usize;
    let mut failed = 0usize;
    let mut all_read = true;

    for input in options.base.inputs.iter() {
        let raws = match read_unit(input) {
            Ok(raws) => raws,
            Err(e) => {
                display::print_file_error(input, &e);
                all_read = false;

                continue;
            }
        };

        let mut table = EntityTable::new();

        for result in translate_in_order(&pool, raws) {
            let result = result.and_then(|info| {
                let function = info.function_name().to_owned();

                table.accept(info).map_err(|e| TranslationFailure {
                    function,
                    error: e.into(),
                })
            });

            match result {
                Ok(()) => translated += 1,
                Err(failure) => {
                    display::print_failure(input, &failure);
                    failed += 1;
                }
            }
        }

        if options.base.verbose {
            for info in table.iter() {
                display::print_translated(input, info);
            }
        }

        if options.dump {
            for info in table.iter() {
                write_entity(&mut out, info)?;
            }
        }
    }

    out.flush()?;
    display::print_summary(translated, failed);

    Ok(all_read && failed == 0)
}

fn pool_for_jobs(jobs: Option<usize>) -> ThreadPool {
    match jobs {
        Some(n) if n > 0 => ThreadPool::new(n),
        _ => ThreadPool::default(),
    }
}

fn read_unit(path: &Path) -> Result<Vec<RawEntityInfo>, ReadError> {
    let source = fs::read_to_string(path)?;

    Ok(serde_json::from_str(&source)?)
}

/// Translates every function on `pool`, handing back the results in the same
/// order as `raws` regardless of the order they finished in.
fn translate_in_order(
    pool: &ThreadPool,
    raws: Vec<RawEntityInfo>,
) -> Vec<Result<EntityInfo, TranslationFailure>> {
    let (send, recv) = mpsc::channel();
    let count = raws.len();

    for (i, raw) in raws.into_iter().enumerate() {
        let send = send.clone();

        pool.execute(move || {
            // the receiver is only dropped once every sender is gone
            let _ = send.send((i, castor::translate_function(&raw)));
        });
    }

    drop(send);

    let mut results = (0..count).map(|_| None).collect::<Vec<_>>();

    for (i, result) in recv {
        results[i] = Some(result);
    }

    results.into_iter().flatten().collect()
}

fn write_entity(out: &mut dyn Write, info: &EntityInfo) -> io::Result<()> {
    let args = info
        .arguments()
        .map(|arg| format!("{}: {}", arg.name, arg.ty))
        .collect::<Vec<_>>()
        .join(", ");

    write!(
        out,
        "; {}({args}) -> {}",
        info.function_name(),
        info.return_type()
    )?;

    if let Some(pos) = info.function_position() {
        write!(
            out,
            " @ {}:{}:{}",
            info.ast().string(pos.file()),
            pos.first_line(),
            pos.first_col()
        )?;
    }

    writeln!(out)?;

    if info.is_declaration() {
        writeln!(out, "; declaration")?;
    }

    let writer = AstWriter::new(info.ast()).with_positions(info.source_positions());

    for bb in info.basic_blocks() {
        writeln!(out, "{}", writer.stringify(*bb))?;
    }

    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use castor::transfer::{RawBlock, RawInstruction, RawOperand, RawPosition};

    fn numbered(i: usize) -> RawEntityInfo {
        let mut raw = RawEntityInfo::new(&format!("f{i}"), "Int");

        raw.blocks.push(RawBlock {
            label: "bb0".into(),
            instructions: vec![RawInstruction::new(
                "return",
                vec![RawOperand::Int(i as i64)],
            )],
        });

        raw
    }

    #[test]
    fn results_keep_input_order() {
        let pool = ThreadPool::new(4);
        let mut raws = (0..64).map(numbered).collect::<Vec<_>>();

        raws[10].version = 0;

        let results = translate_in_order(&pool, raws);

        assert_eq!(results.len(), 64);

        for (i, result) in results.iter().enumerate() {
            match result {
                Ok(info) => assert_eq!(info.function_name(), format!("f{i}")),
                Err(failure) => {
                    assert_eq!(i, 10);
                    assert_eq!(failure.function, "f10");
                }
            }
        }
    }

    #[test]
    fn dump_format() {
        let mut raw = numbered(3);

        raw.argument_names.push("x".into());
        raw.argument_types.push("Int".into());
        raw.argument_positions.push(RawPosition::new("a.swift", 1, 4, 1, 9));
        raw.function_position = Some(RawPosition::new("a.swift", 1, 1, 2, 1));

        let info = castor::translate(&raw).unwrap();
        let mut out = Vec::new();

        write_entity(&mut out, &info).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "; f3(x: Int) -> Int @ a.swift:1:1\n(BLOCK_STMT\n  (LABEL \"bb0\")\n  (RETURN 3))\n\n"
        );
    }
}
