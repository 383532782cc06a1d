//! C# P/Invoke generator.
//!
//! Declarations are lowered into [`BindingSymbol`]s by one emitter per
//! declaration kind, then rendered into a single compilation unit by the
//! [`assembler::OutputAssembler`].

pub mod assembler;
pub mod context;
pub mod enum_emitter;
pub mod function_emitter;
pub mod struct_emitter;
pub mod templates;
pub mod typedef_emitter;

use crate::analysis::classifier::{classify, DeclKind};
use crate::analysis::naming::NamingPolicy;
use crate::analysis::registry::{Scope, SymbolIndex, SymbolRegistry};
use crate::analysis::type_mapper::TypeMapper;
use crate::error::MappingError;
use crate::frontend::{Cursor, TranslationUnit};
use crate::generators::base::templates::GlobalContext;
use crate::models::{BindingSymbol, SkippedSymbol, SymbolBody, SymbolKind};
use crate::Result;
use assembler::OutputAssembler;
use tera::Tera;

/// Indentation of namespace-level declarations
pub(crate) const TYPE_INDENT: &str = "    ";
/// Indentation of members and of declarations inside the container
pub(crate) const MEMBER_INDENT: &str = "        ";

/// Passes run over every translation unit, in this order
const PASSES: [DeclKind; 4] = [
    DeclKind::Record,
    DeclKind::Typedef,
    DeclKind::Enum,
    DeclKind::Function,
];

/// Upper bound on dry-run rounds while the symbol index settles
const MAX_INDEX_PASSES: usize = 32;

/// What every lowering step reads
pub struct Lowering<'a> {
    pub registry: &'a SymbolRegistry,
    pub naming: &'a NamingPolicy,
    pub marshal_strings: bool,
}

impl<'a> Lowering<'a> {
    pub fn new(registry: &'a SymbolRegistry, naming: &'a NamingPolicy, marshal_strings: bool) -> Self {
        Self {
            registry,
            naming,
            marshal_strings,
        }
    }

    pub fn mapper(&self) -> TypeMapper<'a> {
        TypeMapper::new(self.registry, self.marshal_strings)
    }
}

#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    pub namespace: String,
    /// Library identifier written into every `DllImport`
    pub library: String,
    /// Name of the static class holding the function imports
    pub container: String,
    pub marshal_strings: bool,
    pub naming: NamingPolicy,
}

/// Result of one generator run
#[derive(Debug, Clone)]
pub struct GeneratedBindings {
    pub source: String,
    /// Emitted symbols in output order; hoisted records precede their parent
    pub symbols: Vec<BindingSymbol>,
    pub skipped: Vec<SkippedSymbol>,
}

impl GeneratedBindings {
    pub fn count(&self, kind: SymbolKind) -> usize {
        self.symbols.iter().filter(|symbol| symbol.kind == kind).count()
    }
}

#[derive(Debug, Default)]
struct PassOutput {
    symbols: Vec<BindingSymbol>,
    skipped: Vec<SkippedSymbol>,
}

pub struct CSharpBindingsGenerator {
    options: GeneratorOptions,
    tera: Tera,
    global: GlobalContext,
}

impl CSharpBindingsGenerator {
    pub fn new(options: GeneratorOptions) -> Result<Self> {
        Ok(Self {
            options,
            tera: templates::create_template_engine()?,
            global: GlobalContext::default(),
        })
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Generate the bindings for all units. Units keep the order they were
    /// given in; the first occurrence of a declaration wins.
    pub fn generate(&self, units: &[TranslationUnit]) -> Result<GeneratedBindings> {
        let index = self.build_index(units);
        let mut registry = self.registry(index);
        let output = self.run_passes(units, &mut registry);

        let mut assembler = OutputAssembler::new();
        for symbol in &output.symbols {
            let in_container = symbol.kind == SymbolKind::Function;
            let indent = if in_container { MEMBER_INDENT } else { TYPE_INDENT };
            let mut fragments = Vec::new();
            for delegate in symbol.delegates() {
                fragments.push(typedef_emitter::render_delegate(&self.tera, &delegate, indent)?);
            }
            fragments.push(self.render_symbol(symbol)?);
            for fragment in fragments {
                if in_container {
                    assembler.push_function(fragment);
                } else {
                    assembler.push_type(fragment);
                }
            }
        }

        let source = assembler.finish(
            &self.tera,
            &self.global,
            &self.options.namespace,
            &self.options.container,
        )?;

        Ok(GeneratedBindings {
            source,
            symbols: output.symbols,
            skipped: output.skipped,
        })
    }

    /// Dry run: lower everything without rendering until the set of
    /// emittable records, enums and aliases stops changing
    pub fn build_index(&self, units: &[TranslationUnit]) -> SymbolIndex {
        let mut index = SymbolIndex::default();
        for _ in 0..MAX_INDEX_PASSES {
            let mut registry = self.registry(index.clone());
            self.run_passes(units, &mut registry);
            let discovered = registry.into_discovered();
            if discovered == index {
                break;
            }
            index = discovered;
        }
        index
    }

    fn registry(&self, index: SymbolIndex) -> SymbolRegistry {
        let mut registry = SymbolRegistry::with_index(index);
        // members may not be named like their enclosing class
        registry.claim(Scope::Container, &self.options.container);
        registry
    }

    fn run_passes(&self, units: &[TranslationUnit], registry: &mut SymbolRegistry) -> PassOutput {
        let mut output = PassOutput::default();
        for pass in PASSES {
            for unit in units {
                for cursor in unit.declarations() {
                    if classify(cursor) != Some(pass) {
                        continue;
                    }
                    match self.process(pass, cursor, registry) {
                        Ok(symbols) => output.symbols.extend(symbols),
                        Err(err) => {
                            let skipped = SkippedSymbol {
                                kind: symbol_kind(pass),
                                name: native_name(pass, cursor)
                                    .unwrap_or("<anonymous>")
                                    .to_string(),
                                reason: err.to_string(),
                            };
                            if !output.skipped.contains(&skipped) {
                                output.skipped.push(skipped);
                            }
                        }
                    }
                }
            }
        }
        output
    }

    /// Lower one declaration and claim its names
    fn process(
        &self,
        pass: DeclKind,
        cursor: &Cursor,
        registry: &mut SymbolRegistry,
    ) -> std::result::Result<Vec<BindingSymbol>, MappingError> {
        let kind = symbol_kind(pass);
        let native = native_name(pass, cursor);
        if native.is_some_and(|native| registry.is_emitted(kind, native)) {
            return Ok(Vec::new());
        }

        let (symbols, blittable) = {
            let lowering = Lowering::new(
                registry,
                &self.options.naming,
                self.options.marshal_strings,
            );
            let symbols: Vec<BindingSymbol> = match pass {
                DeclKind::Record => struct_emitter::lower(cursor, &lowering)?,
                DeclKind::Typedef => typedef_emitter::lower(cursor, &lowering)?
                    .into_iter()
                    .collect(),
                DeclKind::Enum => vec![enum_emitter::lower(cursor)?],
                DeclKind::Function => function_emitter::lower(cursor, &lowering)?
                    .into_iter()
                    .collect(),
            };
            let mapper = lowering.mapper();
            let blittable = match symbols.last().map(|symbol| &symbol.body) {
                Some(SymbolBody::Record { .. }) => struct_emitter::is_blittable(&symbols, &mapper),
                Some(SymbolBody::Alias { ty, .. }) => mapper.is_blittable(ty),
                _ => false,
            };
            (symbols, blittable)
        };
        let Some(main) = symbols.last() else {
            return Ok(symbols);
        };

        let scope = if pass == DeclKind::Function {
            Scope::Container
        } else {
            Scope::Types
        };
        let delegates: Vec<_> = symbols.iter().flat_map(BindingSymbol::delegates).collect();
        let names: Vec<&str> = symbols
            .iter()
            .map(|symbol| symbol.emitted_name.as_str())
            .chain(delegates.iter().map(|delegate| delegate.name.as_str()))
            .collect();
        if let Some(taken) = registry.first_conflict(scope, &names) {
            return Err(MappingError::NameCollision(taken.to_string()));
        }
        for name in &names {
            registry.claim(scope, name);
        }

        registry.mark_emitted(kind, &main.native_name);
        match main.body {
            SymbolBody::Record { .. } => registry.mark_record(&main.native_name),
            SymbolBody::Enum { .. } => registry.mark_enum(&main.native_name),
            SymbolBody::Alias { .. } | SymbolBody::Delegate(_) => {
                registry.mark_alias(&main.native_name)
            }
            SymbolBody::Function { .. } => {}
        }
        if blittable {
            registry.mark_blittable(&main.native_name);
        }

        Ok(symbols)
    }

    fn render_symbol(&self, symbol: &BindingSymbol) -> std::result::Result<String, tera::Error> {
        let tera = &self.tera;
        let name = symbol.emitted_name.as_str();
        match &symbol.body {
            SymbolBody::Record {
                is_union,
                pack,
                fields,
            } => struct_emitter::render(tera, name, *is_union, *pack, fields),
            SymbolBody::Alias { field, ty } => typedef_emitter::render_alias(tera, name, field, ty),
            SymbolBody::Delegate(delegate) => {
                typedef_emitter::render_delegate(tera, delegate, TYPE_INDENT)
            }
            SymbolBody::Enum {
                underlying,
                members,
            } => enum_emitter::render(tera, name, *underlying, members),
            SymbolBody::Function {
                return_type,
                params,
                calling_convention,
            } => function_emitter::render(
                tera,
                &symbol.native_name,
                name,
                return_type,
                params,
                *calling_convention,
                &self.options.library,
            ),
        }
    }
}

fn symbol_kind(pass: DeclKind) -> SymbolKind {
    match pass {
        DeclKind::Record => SymbolKind::Struct,
        DeclKind::Typedef => SymbolKind::Typedef,
        DeclKind::Enum => SymbolKind::Enum,
        DeclKind::Function => SymbolKind::Function,
    }
}

/// Name used for first-occurrence deduplication and in reports
fn native_name(pass: DeclKind, cursor: &Cursor) -> Option<&str> {
    match pass {
        DeclKind::Record | DeclKind::Enum => cursor.type_name(),
        DeclKind::Typedef | DeclKind::Function => Some(cursor.spelling.as_str()),
    }
}
