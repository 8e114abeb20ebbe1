use crate::config::FilterConfig;
use crate::error::{FilterError, Result};
use crate::filter::{ClosestStopFilter, FilterStats};
use crate::record::VehicleRecord;
use crate::stream::{RecordReader, RecordWriter};
use std::future::Future;
use std::io::{Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task;
use tracing::{info, warn};

/// Outcome of a pipeline run.
#[derive(Debug)]
pub struct PipelineReport<W> {
    pub stats: FilterStats,
    /// The output sink, flushed.
    pub output: W,
    /// Whether `shutdown` fired before the input ended.
    pub interrupted: bool,
}

/// Streams `input` through the filter into `output`.
///
/// Reading and writing run on blocking tasks joined to the filter by bounded
/// channels. When `shutdown` resolves the reader stops, records already read
/// are still filtered, and the final flush is written before returning.
pub async fn run_pipeline<R, W, S>(
    input: R,
    output: W,
    config: FilterConfig,
    shutdown: S,
) -> Result<PipelineReport<W>>
where
    R: Read + Send + 'static,
    W: Write + Send + 'static,
    S: Future<Output = ()>,
{
    let capacity = config.channel_capacity.max(1);
    let delimiter = config.delimiter_byte()?;

    let reader_config = config.clone();
    let reader = task::spawn_blocking(move || RecordReader::new(input, &reader_config)).await??;
    let headers = reader.headers().clone();

    let (record_tx, mut record_rx) = mpsc::channel::<VehicleRecord>(capacity);
    let (emit_tx, mut emit_rx) = mpsc::channel::<VehicleRecord>(capacity);
    let stop = Arc::new(AtomicBool::new(false));

    let reader_stop = stop.clone();
    let reader_handle = task::spawn_blocking(move || -> Result<()> {
        for record in reader {
            if reader_stop.load(Ordering::Relaxed) {
                break;
            }
            if record_tx.blocking_send(record?).is_err() {
                break;
            }
        }
        Ok(())
    });

    let writer_handle = task::spawn_blocking(move || -> Result<W> {
        let mut writer = RecordWriter::new(output, &headers, delimiter)?;
        while let Some(record) = emit_rx.blocking_recv() {
            writer.write(&record)?;
        }
        writer.finish()
    });

    let mut filter = ClosestStopFilter::new(config.time_zone);
    let mut ready = Vec::new();
    let mut interrupted = false;
    let mut writer_gone = false;
    tokio::pin!(shutdown);

    loop {
        let record = tokio::select! {
            record = record_rx.recv() => record,
            _ = &mut shutdown, if !interrupted => {
                warn!(buffered = filter.buffered(), "interrupted, flushing buffered candidates");
                interrupted = true;
                stop.store(true, Ordering::Relaxed);
                record_rx.close();
                continue;
            }
        };
        let Some(record) = record else {
            break;
        };
        filter.process(record, |r| ready.push(r));
        if !forward(&emit_tx, &mut ready).await {
            writer_gone = true;
            break;
        }
    }

    if !writer_gone {
        filter.flush(|r| ready.push(r));
        writer_gone = !forward(&emit_tx, &mut ready).await;
    }
    drop(emit_tx);

    let output = writer_handle.await??;
    if writer_gone {
        return Err(FilterError::ChannelClosed { stage: "writer" });
    }
    // A reader parked on a blocking read cannot be stopped; leave it behind.
    if !interrupted {
        reader_handle.await??;
    }

    let stats = *filter.stats();
    info!(
        accepted = stats.accepted,
        superseded = stats.superseded,
        emitted = stats.emitted,
        flushes = stats.flushes,
        peak_buffered = stats.peak_buffered,
        interrupted,
        "stream filtered"
    );

    Ok(PipelineReport {
        stats,
        output,
        interrupted,
    })
}

/// Sends queued records to the writer; false once the writer has hung up.
async fn forward(emit_tx: &mpsc::Sender<VehicleRecord>, ready: &mut Vec<VehicleRecord>) -> bool {
    for record in ready.drain(..) {
        if emit_tx.send(record).await.is_err() {
            return false;
        }
    }
    true
}
