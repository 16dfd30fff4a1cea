use sales_invoice::cli::Prompter;
use sales_invoice::models::{Invoice, InvoiceId};
use sales_invoice::{
    logging, AppConfig, CsvRateSource, EventSink, InvoiceAssembler, InvoiceError, InvoiceEvent,
    PdfRenderer, TaxCalculator, TracingSink,
};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

fn main() -> ExitCode {
    // Load config
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Initialize logging
    if let Err(e) = logging::init(&config.log) {
        eprintln!("Cannot open log file {}: {e}", config.log_path().display());
        return ExitCode::FAILURE;
    }
    info!("Starting with config: {:?}", config);

    let sink = TracingSink;
    match run(&config, &sink) {
        Ok(path) => {
            println!("Invoice saved to {}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            sink.record(&InvoiceEvent::RunFailed { reason: e.to_string() });
            println!("An error occurred while generating the invoice: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &AppConfig, sink: &dyn EventSink) -> Result<PathBuf, InvoiceError> {
    sink.record(&InvoiceEvent::RunStarted);

    // 1. Invoice number
    let invoice_id = InvoiceId::generate(&config.output.invoice_prefix, &mut rand::thread_rng());

    // 2. Customer and items from stdin
    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout(), sink);
    let customer = prompter.read_customer()?;
    let items = prompter.read_items()?;
    let invoice = Invoice::new(invoice_id, customer, items)?;

    // 3. Totals, layout, write
    let calculator = TaxCalculator::new(CsvRateSource::new(&config.rates.path));
    let assembler = InvoiceAssembler::new(calculator, PdfRenderer, &config.output.dir);
    assembler.generate(&invoice, sink)
}
