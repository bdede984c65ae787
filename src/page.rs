//! Embedded single-page UI: device checklist + map canvas.
//!
//! The page fetches `/api/devices` to build the checklist (all checked), then
//! posts the full selection to `/api/figure` on every toggle and redraws.

pub const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Mapping of devices</title>
  <script src="https://cdn.plot.ly/plotly-2.35.2.min.js" charset="utf-8"></script>
  <style>
    body { margin: 0; font-family: sans-serif; display: flex; height: 100vh; }
    .data_filters { padding: 12px; min-width: 180px; overflow-y: auto; }
    .data_filters label.title { color: black; font-weight: bold; display: block; margin-bottom: 8px; }
    .data_filters .device { display: flex; align-items: center; gap: 6px; margin: 4px 0; }
    .data_filters .swatch { width: 10px; height: 10px; border-radius: 50%; display: inline-block; }
    .Map_printing { flex: 1; }
    #graph { background: #00FC87; padding-bottom: 2px; padding-left: 2px; height: 100vh; }
  </style>
</head>
<body>
  <div class="data_filters">
    <label class="title">Mac Adress: </label>
    <div id="MAC_address_checklist"></div>
  </div>
  <div class="Map_printing">
    <div id="graph"></div>
  </div>

  <script>
    const checklist = document.getElementById('MAC_address_checklist');
    const plotConfig = { displayModeBar: false, scrollZoom: true };

    function selection() {
      return Array.from(checklist.querySelectorAll('input:checked')).map(el => el.value);
    }

    async function redraw() {
      const res = await fetch('/api/figure', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify({ selection: selection() }),
      });
      if (!res.ok) {
        console.error('figure request failed', res.status);
        return;
      }
      const fig = await res.json();
      Plotly.react('graph', fig.data, fig.layout, plotConfig);
    }

    async function init() {
      const devices = await (await fetch('/api/devices')).json();
      for (const d of devices) {
        const row = document.createElement('label');
        row.className = 'device';
        const box = document.createElement('input');
        box.type = 'checkbox';
        box.value = d.id;
        box.checked = true;
        box.addEventListener('change', redraw);
        const swatch = document.createElement('span');
        swatch.className = 'swatch';
        swatch.style.background = d.color;
        row.append(box, swatch, document.createTextNode(d.id));
        checklist.appendChild(row);
      }
      redraw();
    }

    init();
  </script>
</body>
</html>
"#;
