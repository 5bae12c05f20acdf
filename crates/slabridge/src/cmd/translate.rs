use std::io::BufRead;

use slabridge_gcode::{Translator, TranslatorConfig};
use tracing::{info, warn};

use crate::cmd::{open_input, TranslateArgs};
use crate::exit::{io_error, translate_error, CliResult, SUCCESS};
use crate::output::{print_packets, OutputFormat, PacketRecord};

pub fn run(args: TranslateArgs, format: OutputFormat) -> CliResult<i32> {
    let translator = Translator::new(TranslatorConfig {
        print_offset: args.print_offset,
    });
    let input = open_input(args.file.as_deref())?;

    let outcome = translate_lines(&translator, input, args.strict)?;
    print_packets(&outcome.records, format);
    info!(
        frames = outcome.records.len(),
        skipped = outcome.skipped,
        "translation finished"
    );
    Ok(SUCCESS)
}

#[derive(Debug, Default)]
struct Outcome {
    records: Vec<PacketRecord>,
    skipped: usize,
}

fn translate_lines<R: BufRead>(
    translator: &Translator,
    input: R,
    strict: bool,
) -> CliResult<Outcome> {
    let mut outcome = Outcome::default();
    for (index, line) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = line.map_err(|err| io_error("failed reading input", err))?;
        match translator.translate(&line) {
            Ok(Some(packet)) => outcome
                .records
                .push(PacketRecord::new(line_no, &line, &packet)),
            Ok(None) => {}
            Err(err) if strict => return Err(translate_error(&format!("line {line_no}"), err)),
            Err(err) => {
                outcome.skipped += 1;
                warn!(line = line_no, error = %err, "line skipped");
            }
        }
    }
    Ok(outcome)
}
