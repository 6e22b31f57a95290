use std::collections::{HashMap, HashSet};

use sha2::{Digest, Sha256};
use tracing::debug;
use uuid::Uuid;

use super::price::{parse_optional_price, parse_price};
use super::rows::RowKind;
use crate::model::{Catalog, Family, Item, Optional, Relation, Summary};

/// Content-addressed family code: first 8 hex chars (uppercase) of the
/// SHA-256 of the lowercase "<chapter_key>:<title>". The same key and title
/// reproduce the same code across runs, which downstream imports rely on
/// instead of database-assigned ids.
pub fn family_code(chapter_key: &str, title: &str) -> String {
    let text = format!("{}:{}", chapter_key, title).to_lowercase();
    let digest = Sha256::digest(text.as_bytes());
    hex::encode(&digest[..4]).to_uppercase()
}

/// Deterministic optional id: UUID v5 over the normalized title, so
/// re-parsing the same sheet reproduces the same ids.
fn optional_id(key: &str) -> String {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_bytes()).to_string()
}

fn placeholder_title(chapter: &str) -> String {
    format!("Category {}", chapter)
}

/// Stateful accumulator folding classified rows into catalog records.
/// Owns every map for exactly one parse invocation; a fresh builder starts
/// from nothing.
#[derive(Debug)]
pub struct CatalogBuilder {
    first_family_only: bool,

    current_chapter: Option<String>,
    current_subchapter: Option<String>,
    in_optional_section: bool,
    /// External refs of articles seen since the last header, in insertion
    /// order without duplicates; optionals below link against these.
    items_in_scope: Vec<String>,

    families: Vec<Family>,
    family_index: HashMap<String, usize>,
    /// Chapter keys whose family was synthesized from a sub-chapter row and
    /// still awaits its real header.
    placeholders: HashSet<String>,
    /// The one chapter_key -> stable code map, consulted by both the
    /// chapter and sub-chapter transitions.
    codes: HashMap<String, String>,

    items: Vec<Item>,
    optionals: Vec<Optional>,
    optional_ids: HashMap<String, String>,
    relations: Vec<Relation>,
    linked: HashSet<(String, String)>,

    first_chapter: Option<String>,
    done: bool,
}

impl CatalogBuilder {
    pub fn new(first_family_only: bool) -> Self {
        Self {
            first_family_only,
            current_chapter: None,
            current_subchapter: None,
            in_optional_section: false,
            items_in_scope: Vec::new(),
            families: Vec::new(),
            family_index: HashMap::new(),
            placeholders: HashSet::new(),
            codes: HashMap::new(),
            items: Vec::new(),
            optionals: Vec::new(),
            optional_ids: HashMap::new(),
            relations: Vec::new(),
            linked: HashSet::new(),
            first_chapter: None,
            done: false,
        }
    }

    pub fn in_optional_section(&self) -> bool {
        self.in_optional_section
    }

    /// True once first-family-only truncation has fired; the caller must
    /// stop feeding rows.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Fold one classified row into the accumulated state.
    pub fn fold(&mut self, kind: RowKind) {
        match kind {
            RowKind::OptionalMarker => self.in_optional_section = true,
            RowKind::Chapter { number, title } => self.fold_chapter(number, title),
            RowKind::Subchapter {
                chapter,
                number,
                title,
            } => self.fold_subchapter(chapter, number, title),
            RowKind::OptionalLine {
                title_es,
                title_en,
                price,
            } => self.fold_optional(title_es, title_en, &price),
            RowKind::Article {
                numeric_id,
                external_ref,
                code_label,
                title_es,
                title_en,
                price,
            } => self.fold_article(numeric_id, external_ref, code_label, title_es, title_en, &price),
            RowKind::Ignorable => {}
        }
    }

    fn fold_chapter(&mut self, number: String, title: String) {
        match self.family_index.get(&number).copied() {
            None => {
                let code = family_code(&number, &title);
                self.codes.insert(number.clone(), code.clone());
                self.family_index.insert(number.clone(), self.families.len());
                self.families.push(Family {
                    stable_code: code,
                    chapter_key: number.clone(),
                    title,
                    parent_stable_code: None,
                    depth: 1,
                });
            }
            Some(slot) => {
                if self.placeholders.remove(&number) {
                    // A sub-chapter created this family before its header
                    // appeared; back-fill the real title, re-key, and move
                    // existing children to the new code.
                    let old_code = self.families[slot].stable_code.clone();
                    let code = family_code(&number, &title);
                    debug!("back-filling placeholder chapter {} as '{}'", number, title);
                    self.families[slot].title = title;
                    self.families[slot].stable_code = code.clone();
                    self.codes.insert(number.clone(), code.clone());
                    for family in &mut self.families {
                        if family.depth == 2
                            && family.parent_stable_code.as_deref() == Some(old_code.as_str())
                        {
                            family.parent_stable_code = Some(code.clone());
                        }
                    }
                }
            }
        }

        self.current_chapter = Some(number.clone());
        self.current_subchapter = None;
        self.in_optional_section = false;
        self.items_in_scope.clear();

        if self.first_family_only {
            match &self.first_chapter {
                None => self.first_chapter = Some(number),
                Some(first) if *first != number => self.done = true,
                Some(_) => {}
            }
        }
    }

    fn fold_subchapter(&mut self, chapter: String, number: String, title: String) {
        let sub_key = format!("{}.{}", chapter, number);

        if !self.family_index.contains_key(&chapter) {
            // Sheet mentions "N.M" before any "N." header; synthesize the
            // parent so the child has something to hang from. A later real
            // header back-fills it.
            let title = placeholder_title(&chapter);
            let code = family_code(&chapter, &title);
            debug!("synthesizing placeholder family for chapter {}", chapter);
            self.codes.insert(chapter.clone(), code.clone());
            self.family_index.insert(chapter.clone(), self.families.len());
            self.placeholders.insert(chapter.clone());
            self.families.push(Family {
                stable_code: code,
                chapter_key: chapter.clone(),
                title,
                parent_stable_code: None,
                depth: 1,
            });
        }

        if !self.family_index.contains_key(&sub_key) {
            let code = family_code(&sub_key, &title);
            let parent = self.codes.get(&chapter).cloned();
            self.codes.insert(sub_key.clone(), code.clone());
            self.family_index.insert(sub_key.clone(), self.families.len());
            self.families.push(Family {
                stable_code: code,
                chapter_key: sub_key.clone(),
                title,
                parent_stable_code: parent,
                depth: 2,
            });
        }

        self.current_subchapter = Some(sub_key);
        self.in_optional_section = false;
        self.items_in_scope.clear();
    }

    fn fold_optional(&mut self, title_es: String, title_en: String, price_text: &str) {
        if title_es.is_empty() {
            return;
        }

        let key = title_es.trim().to_lowercase();
        let id = match self.optional_ids.get(&key) {
            Some(id) => id.clone(),
            None => {
                let id = optional_id(&key);
                let (price, remark) = parse_optional_price(price_text);
                let (mut title_es, mut title_en) = (title_es, title_en);
                if let Some(remark) = remark {
                    // Non-numeric price text travels with the titles
                    title_es = format!("{} ({})", title_es, remark);
                    if !title_en.is_empty() {
                        title_en = format!("{} ({})", title_en, remark);
                    }
                }
                self.optional_ids.insert(key, id.clone());
                self.optionals.push(Optional {
                    id: id.clone(),
                    title_es,
                    title_en,
                    price,
                });
                id
            }
        };

        // Fires on every occurrence, repeats included: a duplicate optional
        // re-links against whatever is in scope now. Only novel pairs append.
        for external_ref in &self.items_in_scope {
            let pair = (external_ref.clone(), id.clone());
            if self.linked.insert(pair) {
                self.relations.push(Relation {
                    item_external_ref: external_ref.clone(),
                    optional_id: id.clone(),
                });
            }
        }
    }

    fn fold_article(
        &mut self,
        numeric_id: String,
        external_ref: String,
        code_label: String,
        title_es: String,
        title_en: String,
        price_text: &str,
    ) {
        self.in_optional_section = false;

        let context = self
            .current_subchapter
            .as_ref()
            .or(self.current_chapter.as_ref());
        let family_stable_code = context.and_then(|key| self.codes.get(key).cloned());

        self.items.push(Item {
            external_ref: external_ref.clone(),
            numeric_id,
            code_label,
            family_stable_code,
            title_es,
            title_en,
            price: parse_price(price_text),
            active: true,
        });

        if !self.items_in_scope.contains(&external_ref) {
            self.items_in_scope.push(external_ref);
        }
    }

    /// Flatten accumulated state into the result lists plus summary counts.
    pub fn finish(self) -> Catalog {
        let chapters = self.families.iter().filter(|f| f.depth == 1).count();
        let subchapters = self.families.iter().filter(|f| f.depth == 2).count();
        Catalog {
            summary: Summary {
                chapters,
                subchapters,
                items: self.items.len(),
                optionals: self.optionals.len(),
            },
            families: self.families,
            items: self.items,
            optionals: self.optionals,
            relations: self.relations,
        }
    }
}

// ── Tests ──
