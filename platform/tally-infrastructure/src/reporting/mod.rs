use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;
use tally_domain::entities::summary::ProfitSummary;
use tally_domain::services::batch::BatchReport;
use tally_domain::services::overlay::SymbolOverlay;
use tally_domain::services::profit::DailyProfit;
use tally_domain::value_objects::equity_point::EquityPoint;

pub fn write_daily_csv(path: &Path, daily: &DailyProfit) -> Result<(), String> {
    let mut wtr = csv::Writer::from_path(path)
        .map_err(|err| format!("failed to create daily csv {}: {}", path.display(), err))?;
    wtr.write_record(["date", "profit"])
        .map_err(|err| format!("failed to write daily csv header: {}", err))?;

    for (day, profit) in daily.iter() {
        wtr.write_record([day.to_string(), profit.to_string()])
            .map_err(|err| format!("failed to write daily row: {}", err))?;
    }

    wtr.flush()
        .map_err(|err| format!("failed to flush daily csv: {}", err))
}

pub fn write_equity_csv(path: &Path, points: &[EquityPoint]) -> Result<(), String> {
    let mut wtr = csv::Writer::from_path(path)
        .map_err(|err| format!("failed to create equity csv {}: {}", path.display(), err))?;
    wtr.write_record(["date", "daily_profit", "cumulative_profit"])
        .map_err(|err| format!("failed to write equity csv header: {}", err))?;

    for point in points {
        wtr.write_record([
            point.date.to_string(),
            point.daily_profit.to_string(),
            point.cumulative_profit.to_string(),
        ])
        .map_err(|err| format!("failed to write equity row: {}", err))?;
    }

    wtr.flush()
        .map_err(|err| format!("failed to flush equity csv: {}", err))
}

/// Summary fields at the top level, with the run metadata under `meta`.
pub fn write_summary_json(
    path: &Path,
    summary: &ProfitSummary,
    meta: Option<&serde_json::Value>,
) -> Result<(), String> {
    let mut json = serde_json::to_value(summary)
        .map_err(|err| format!("failed to serialize summary: {}", err))?;
    if let Some(obj) = json.as_object_mut() {
        obj.insert(
            "meta".to_string(),
            meta.cloned().unwrap_or(serde_json::Value::Null),
        );
    }
    write_pretty_json(path, &json, "summary")
}

pub fn write_batch_report_json(path: &Path, report: &BatchReport) -> Result<(), String> {
    let json = serde_json::json!({
        "rendered": report.rendered(),
        "skipped": report.skipped(),
        "failed": report.failed(),
        "outcomes": report.outcomes,
    });
    write_pretty_json(path, &json, "batch report")
}

fn write_pretty_json(path: &Path, json: &serde_json::Value, what: &str) -> Result<(), String> {
    let json = serde_json::to_string_pretty(json)
        .map_err(|err| format!("failed to serialize {what}: {err}"))?;
    let mut file = fs::File::create(path)
        .map_err(|err| format!("failed to create {what} {}: {err}", path.display()))?;
    file.write_all(json.as_bytes())
        .map_err(|err| format!("failed to write {what}: {err}"))
}

pub fn clear_dir(path: &Path) -> Result<usize, String> {
    if !path.exists() {
        return Ok(0);
    }
    let entries = fs::read_dir(path)
        .map_err(|err| format!("failed to list {}: {}", path.display(), err))?;
    let mut removed = 0usize;
    for entry in entries {
        let entry = entry.map_err(|err| format!("failed to list {}: {}", path.display(), err))?;
        let entry_path = entry.path();
        if entry_path.is_file() {
            fs::remove_file(&entry_path)
                .map_err(|err| format!("failed to remove {}: {}", entry_path.display(), err))?;
            removed += 1;
        }
    }
    Ok(removed)
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// JSON for an inline `<script>` block; `</` is escaped so string data cannot close the tag.
fn script_json<T: Serialize + ?Sized>(value: &T, what: &str) -> Result<String, String> {
    serde_json::to_string(value)
        .map(|json| json.replace("</", "<\\/"))
        .map_err(|err| format!("failed to serialize {what}: {err}"))
}

fn fmt_opt(value: Option<f64>, suffix: &str) -> String {
    value
        .map(|v| format!("{v:.2}{suffix}"))
        .unwrap_or_else(|| "n/a".to_string())
}

const CHART_STYLE: &str = r#"
    body { font-family: ui-sans-serif, system-ui; padding: 24px; }
    code { background: #f2f2f2; padding: 2px 6px; border-radius: 4px; }
    .card { border: 1px solid #ddd; border-radius: 10px; padding: 16px; background: #fff; }
    canvas { width: 100%; height: 360px; border: 1px solid #eee; border-radius: 8px; }
    .muted { color: #666; }
"#;

pub fn write_equity_chart_html(
    path: &Path,
    summary: &ProfitSummary,
    points: &[EquityPoint],
) -> Result<(), String> {
    let equity_json = script_json(points, "equity")?;
    let drawdown = match (&summary.pairwise_drawdown_pct, &summary.pairwise_drawdown_error) {
        (Some(pct), _) => format!("{pct:.2}%"),
        (None, Some(err)) => escape_html(err),
        (None, None) => "n/a".to_string(),
    };

    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8"/>
  <title>Tally Equity</title>
  <style>{CHART_STYLE}</style>
</head>
<body>
  <h1>Cumulative profit</h1>
  <p class="muted">
    mode: <code>{mode}</code> round_trips: <code>{round_trips}</code>
    total_profit: <code>{total_profit:.2}</code> pairwise_drawdown: <code>{drawdown}</code>
    max_drawdown: <code>{max_drawdown:.2}</code> total_return: <code>{total_return}</code>
    annualized: <code>{annualized}</code>
  </p>
  <div class="card"><canvas id="equity"></canvas></div>

  <script>
    const equity = {equity_json};

    function drawCurve(canvas, points) {{
      const ctx = canvas.getContext('2d');
      const w = canvas.width = canvas.clientWidth * window.devicePixelRatio;
      const h = canvas.height = canvas.clientHeight * window.devicePixelRatio;
      ctx.clearRect(0, 0, w, h);

      if (!points || points.length < 2) {{
        ctx.fillStyle = '#666';
        ctx.fillText('not enough equity data', 10, 20);
        return;
      }}

      const times = points.map(p => Date.parse(p.date));
      const values = points.map(p => p.cumulative_profit);
      const minT = Math.min(...times), maxT = Math.max(...times);
      const minV = Math.min(0, ...values), maxV = Math.max(0, ...values);
      const pad = 24 * window.devicePixelRatio;
      const x0 = pad, y0 = pad, x1 = w - pad, y1 = h - pad;
      const x = t => maxT === minT ? (x0 + x1) / 2 : x0 + (t - minT) / (maxT - minT) * (x1 - x0);
      const y = v => maxV === minV ? (y0 + y1) / 2 : y1 - (v - minV) / (maxV - minV) * (y1 - y0);

      ctx.strokeStyle = '#ccc';
      ctx.beginPath();
      ctx.moveTo(x0, y(0));
      ctx.lineTo(x1, y(0));
      ctx.stroke();

      ctx.strokeStyle = '#2b6cb0';
      ctx.lineWidth = 2 * window.devicePixelRatio;
      ctx.beginPath();
      ctx.moveTo(x(times[0]), y(values[0]));
      for (let i = 1; i < points.length; i++) {{
        ctx.lineTo(x(times[i]), y(values[i]));
      }}
      ctx.stroke();

      ctx.fillStyle = '#666';
      ctx.fillText(points[0].date, x0, h - 4);
      ctx.fillText(points[points.length - 1].date, x1 - 60 * window.devicePixelRatio, h - 4);
    }}

    drawCurve(document.getElementById('equity'), equity);
    window.addEventListener('resize', () => drawCurve(document.getElementById('equity'), equity));
  </script>
</body>
</html>"#,
        mode = escape_html(&summary.profit_mode),
        round_trips = summary.round_trips,
        total_profit = summary.total_profit,
        max_drawdown = summary.max_drawdown,
        total_return = fmt_opt(summary.total_return_pct, "%"),
        annualized = fmt_opt(summary.annualized_return_pct, "%"),
    );

    let mut file =
        fs::File::create(path).map_err(|err| format!("failed to create html: {}", err))?;
    file.write_all(html.as_bytes())
        .map_err(|err| format!("failed to write html: {}", err))
}

/// Close-price line with buy (green) and sell (red) markers at the trade prices.
pub fn write_overlay_html(path: &Path, overlay: &SymbolOverlay) -> Result<(), String> {
    let overlay_json = script_json(overlay, "overlay")?;
    let symbol = escape_html(&overlay.symbol);

    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8"/>
  <title>{symbol}</title>
  <style>{CHART_STYLE}</style>
</head>
<body>
  <h1>{symbol}</h1>
  <p class="muted">
    prices: <code>{price_count}</code> buys: <code>{buy_count}</code>
    sells: <code>{sell_count}</code>
  </p>
  <div class="card"><canvas id="overlay"></canvas></div>

  <script>
    const overlay = {overlay_json};

    function drawOverlay(canvas, data) {{
      const ctx = canvas.getContext('2d');
      const dpr = window.devicePixelRatio;
      const w = canvas.width = canvas.clientWidth * dpr;
      const h = canvas.height = canvas.clientHeight * dpr;
      ctx.clearRect(0, 0, w, h);

      const markers = data.buys.concat(data.sells);
      const times = data.prices.map(p => Date.parse(p.date))
        .concat(markers.map(m => Date.parse(m.date)));
      const values = data.prices.map(p => p.close).concat(markers.map(m => m.price));
      if (times.length === 0) {{
        ctx.fillStyle = '#666';
        ctx.fillText('no price data', 10, 20);
        return;
      }}

      const minT = Math.min(...times), maxT = Math.max(...times);
      const minV = Math.min(...values), maxV = Math.max(...values);
      const pad = 24 * dpr;
      const x0 = pad, y0 = pad, x1 = w - pad, y1 = h - pad;
      const x = t => maxT === minT ? (x0 + x1) / 2 : x0 + (t - minT) / (maxT - minT) * (x1 - x0);
      const y = v => maxV === minV ? (y0 + y1) / 2 : y1 - (v - minV) / (maxV - minV) * (y1 - y0);

      if (data.prices.length > 0) {{
        ctx.strokeStyle = '#2b6cb0';
        ctx.lineWidth = 1.5 * dpr;
        ctx.beginPath();
        ctx.moveTo(x(Date.parse(data.prices[0].date)), y(data.prices[0].close));
        for (const p of data.prices.slice(1)) {{
          ctx.lineTo(x(Date.parse(p.date)), y(p.close));
        }}
        ctx.stroke();
      }}

      function marker(m, color, up) {{
        const cx = x(Date.parse(m.date)), cy = y(m.price), r = 5 * dpr;
        ctx.fillStyle = color;
        ctx.beginPath();
        ctx.moveTo(cx, up ? cy - r : cy + r);
        ctx.lineTo(cx - r, up ? cy + r : cy - r);
        ctx.lineTo(cx + r, up ? cy + r : cy - r);
        ctx.closePath();
        ctx.fill();
      }}
      data.buys.forEach(m => marker(m, '#2f855a', true));
      data.sells.forEach(m => marker(m, '#c53030', false));
    }}

    drawOverlay(document.getElementById('overlay'), overlay);
    window.addEventListener('resize', () =>
      drawOverlay(document.getElementById('overlay'), overlay));
  </script>
</body>
</html>"#,
        price_count = overlay.prices.len(),
        buy_count = overlay.buys.len(),
        sell_count = overlay.sells.len(),
    );

    let mut file =
        fs::File::create(path).map_err(|err| format!("failed to create html: {}", err))?;
    file.write_all(html.as_bytes())
        .map_err(|err| format!("failed to write html: {}", err))
}
