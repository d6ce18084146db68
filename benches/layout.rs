use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use trellis::chart::{Axis, AxisId, AxisScale, Orientation, StaticContext, TickRequest};
use trellis::client::{ClientLayout, Page, ParentBox};
use trellis::widget::{BlockWidget, TextWidget};
use trellis::{
    Alignment, DomElement, GridLayout, HtmlRenderer, LayoutItem, Result, Session, Sides, Size,
};

const ROWS: usize = 12;
const COLUMNS: usize = 6;

fn measure(_: &DomElement) -> Size {
    Size::new(60, 18)
}

fn build_layout() -> Result<GridLayout> {
    let mut layout = GridLayout::new("bench", ROWS, COLUMNS);
    layout.set_contents_margins(Sides::default());
    for row in 0..ROWS {
        layout.grid_mut().set_row_stretch(row, (row % 3) as i32);
        for col in 0..COLUMNS {
            let id = format!("r{row}c{col}");
            let item = if (row + col) % 2 == 0 {
                LayoutItem::widget(TextWidget::new(id, "label text"))
            } else {
                LayoutItem::widget(BlockWidget::new(id, Size::new(40, 12 + row as i32)))
            };
            layout.set_cell(row, col, item, 1, 1, Alignment::default())?;
        }
    }
    layout.grid_mut().set_column_stretch(COLUMNS - 1, 1);
    Ok(layout)
}

fn layout_generate(c: &mut Criterion) {
    let renderer = HtmlRenderer::with_default();
    c.bench_function("layout_generate", |b| {
        b.iter(|| {
            let mut layout = build_layout().expect("layout");
            let mut session = Session::default();
            let dom = layout
                .create_dom(true, true, &mut session)
                .expect("create dom");
            black_box(renderer.render_to_string(&dom).expect("render"));
        });
    });
}

fn client_reflow(c: &mut Criterion) {
    let mut layout = build_layout().expect("layout");
    let dom = layout
        .create_dom(true, true, &mut Session::default())
        .expect("create dom");
    let client = ClientLayout::new(layout.render_config().cloned().expect("config"));
    let mut page = Page::new();
    page.mount(&dom, ParentBox::new(1024, 768), &measure)
        .expect("mount");

    let mut height = 768;
    c.bench_function("client_reflow", |b| {
        b.iter(|| {
            height = if height == 768 { 900 } else { 768 };
            page.set_parent("bench", ParentBox::new(1024, height));
            black_box(client.adjust(&mut page));
        });
    });
}

fn axis_ticks(c: &mut Criterion) {
    let ctx = StaticContext::new()
        .with_range(AxisId::X, 2_451_545.0, 2_460_000.0)
        .with_range(AxisId::Y, -12.5, 9_731.0);
    c.bench_function("axis_ticks", |b| {
        b.iter(|| {
            let mut y = Axis::new(AxisId::Y);
            y.prepare_render(Orientation::Vertical, black_box(600.0), &ctx);
            black_box(y.label_ticks(0, TickRequest::default(), &ctx));

            let mut x = Axis::new(AxisId::X);
            x.set_scale(AxisScale::Date);
            x.prepare_render(Orientation::Horizontal, black_box(1200.0), &ctx);
            black_box(x.label_ticks(0, TickRequest::default(), &ctx));
        });
    });
}

criterion_group!(benches, layout_generate, client_reflow, axis_ticks);
criterion_main!(benches);
