use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::plotter::Plotter;

#[derive(Clone, Default)]
struct SharedBuf(Rc<RefCell<Vec<u8>>>);

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn pages_are_written_as_json_lines() {
    let buf = SharedBuf::default();
    let params = PlotterParams::new();
    let mut p = Plotter::new(MetaBackend::new(Box::new(buf.clone()), &params), params);
    p.openpl().unwrap();
    p.fline(0.0, 0.0, 1.0, 1.0).unwrap();
    p.closepl().unwrap();

    let text = String::from_utf8(buf.0.borrow().clone()).unwrap();
    let ops: Vec<MetaOp> = text
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(ops.first(), Some(&MetaOp::OpenPage { page: 1 }));
    assert_eq!(ops.last(), Some(&MetaOp::ClosePage));
    assert_eq!(ops.len(), p.backend().ops().len());
    assert!(text.contains(r#""op":"paint_path""#));
}

#[test]
fn portable_mode_pretty_prints_each_page() {
    let buf = SharedBuf::default();
    let params = PlotterParams::new().with("META_PORTABLE", "yes");
    let mut p = Plotter::new(MetaBackend::new(Box::new(buf.clone()), &params), params);
    p.openpl().unwrap();
    p.closepl().unwrap();
    p.openpl().unwrap();
    p.closepl().unwrap();

    let text = String::from_utf8(buf.0.borrow().clone()).unwrap();
    let mut pages = serde_json::Deserializer::from_str(&text).into_iter::<Vec<MetaOp>>();
    let first = pages.next().unwrap().unwrap();
    let second = pages.next().unwrap().unwrap();
    assert_eq!(first[0], MetaOp::OpenPage { page: 1 });
    assert_eq!(second[0], MetaOp::OpenPage { page: 2 });
    assert!(pages.next().is_none());
}

#[test]
fn capabilities_can_be_narrowed() {
    let b = MetaBackend::new(Box::new(std::io::sink()), &PlotterParams::new())
        .with_capabilities(Capabilities::polylines_only());
    assert!(!b.capabilities().mixed_paths);
}
