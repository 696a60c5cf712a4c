use crate::BuildError;
use pdf_writer::Ref;
use std::collections::HashMap;

/// Every kind of indirect object the document writes. Indices refer to the
/// position of the page in the document, or to the embedded font's arena index
#[derive(Eq, PartialEq, Hash, Copy, Clone, Debug)]
pub enum RefType {
    Catalog,
    Info,
    PageTree,
    Page(usize),
    ContentForPage(usize),
    Font(usize),
    CidFont(usize),
    ToUnicode(usize),
    FontDescriptor(usize),
    FontData(usize),
}

/// Allocates PDF object ids and remembers which object each id was handed out for
pub struct ObjectReferences {
    refs: HashMap<RefType, Ref>,
    next_id: i32,
}

impl ObjectReferences {
    pub fn new() -> ObjectReferences {
        ObjectReferences {
            refs: HashMap::new(),
            next_id: 1,
        }
    }

    /// Look up a previously generated reference
    pub fn get(&self, ref_type: RefType) -> Result<Ref, BuildError> {
        self.refs
            .get(&ref_type)
            .copied()
            .ok_or_else(|| BuildError::MissingReference(format!("{ref_type:?}")))
    }

    /// Allocate the next object id for `ref_type`
    pub fn gen(&mut self, ref_type: RefType) -> Ref {
        let id = Ref::new(self.next_id);
        self.next_id += 1;
        self.refs.insert(ref_type, id);
        id
    }
}
