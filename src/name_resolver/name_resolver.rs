use log::{debug, info};

use crate::{
    ast::{
        ast::{Block, Decl, FnDecl, FormalDecl, IdNode, Program, StructDecl, TypeNode, VarDecl},
        expressions::{DotAccessExpr, Expr},
        statements::Stmt,
    },
    context::CompilationContext,
    errors::errors::{ErrorImpl, InternalError},
    symbols::{
        symbol::{
            FunctionSymbol, Storage, StructDefSymbol, StructInstanceSymbol, Symbol, SymbolId,
            VariableSymbol, WORD_SIZE,
        },
        symbol_table::SymbolTable,
    },
    type_checker::types::Type,
    Position,
};

/// Formals sit above the saved return address; locals start below the
/// control link.
const FIRST_LOCAL_OFFSET: i32 = -8;

/// Layout of the function currently being resolved.
#[derive(Debug, Default)]
struct Frame {
    locals_size: u32,
}

/// Where a variable declaration puts its name and storage.
enum DeclTarget<'t> {
    Global,
    Local,
    Field {
        table: &'t mut SymbolTable,
        offset: &'t mut u32,
    },
}

/// What a declared type turned out to denote.
enum DeclaredType {
    Scalar(Type),
    Struct { name: String, def: SymbolId, size: u32 },
}

impl DeclaredType {
    fn size(&self) -> u32 {
        match self {
            DeclaredType::Scalar(_) => WORD_SIZE,
            DeclaredType::Struct { size, .. } => *size,
        }
    }
}

/// Outcome of resolving one link of a dot-access chain.
enum DotOutcome {
    /// The accessed field is itself a struct instance of this definition.
    Struct(SymbolId),
    Scalar,
    /// Already reported; the rest of the chain stays silent.
    Failed,
}

pub struct NameResolver<'a> {
    pub context: &'a mut CompilationContext,
    /// The lexical scope stack. Starts with the program scope open.
    pub table: SymbolTable,
    frame: Option<Frame>,
}

impl<'a> NameResolver<'a> {
    pub fn new(context: &'a mut CompilationContext) -> Self {
        NameResolver {
            context,
            table: SymbolTable::new(),
            frame: None,
        }
    }

    fn report(&mut self, error: ErrorImpl, position: Position) {
        self.context.diagnostics.report(error, position);
    }

    fn alloc(&mut self, symbol: Symbol) -> SymbolId {
        let id = self.context.symbols.alloc(symbol);
        debug!("declared {:?}", id);
        id
    }

    fn allocate_local(&mut self, size: u32) -> Result<Storage, InternalError> {
        let frame = self
            .frame
            .as_mut()
            .ok_or(InternalError::NoEnclosingFunction {
                construct: "local declaration",
            })?;

        let offset =
            FIRST_LOCAL_OFFSET - frame.locals_size as i32 - size as i32 + WORD_SIZE as i32;
        frame.locals_size += size;

        Ok(Storage::Local { offset })
    }
}

/// Binds every identifier in `program` to its declaration, reporting
/// undeclared and misdeclared names. A missing `main` is reported once,
/// after all top-level declarations.
pub fn resolve_names(
    program: &mut Program,
    context: &mut CompilationContext,
) -> Result<(), InternalError> {
    info!("resolving names in {} declaration(s)", program.decls.len());
    let mut resolver = NameResolver::new(context);

    for decl in program.decls.iter_mut() {
        resolve_decl(&mut resolver, decl)?;
    }

    resolver.table.remove_scope()?;

    if !resolver.context.main_declared {
        resolver.report(ErrorImpl::NoMainFunction, Position::null());
    }

    Ok(())
}

pub fn resolve_decl(resolver: &mut NameResolver, decl: &mut Decl) -> Result<(), InternalError> {
    match decl {
        Decl::Var(var) => resolve_var_decl(resolver, var, DeclTarget::Global),
        Decl::Fn(function) => resolve_fn_decl(resolver, function),
        Decl::Struct(def) => resolve_struct_decl(resolver, def),
    }
}

/// Resolves a written type. Struct names are looked up through the
/// lexical scopes; `None` means a diagnostic was reported.
fn resolve_type_node(
    resolver: &mut NameResolver,
    ty: &mut TypeNode,
) -> Result<Option<DeclaredType>, InternalError> {
    let id = match ty {
        TypeNode::Int => return Ok(Some(DeclaredType::Scalar(Type::Int))),
        TypeNode::Bool => return Ok(Some(DeclaredType::Scalar(Type::Bool))),
        TypeNode::Void => return Ok(Some(DeclaredType::Scalar(Type::Void))),
        TypeNode::Struct(id) => id,
    };

    if let Some(symbol) = resolver.table.lookup_global(&id.name) {
        if let Symbol::StructDef(def) = resolver.context.symbols.get(symbol)? {
            let size = def.size;
            id.symbol = Some(symbol);

            return Ok(Some(DeclaredType::Struct {
                name: id.name.clone(),
                def: symbol,
                size,
            }));
        }
    }

    let error = ErrorImpl::InvalidStructType {
        name: id.name.clone(),
    };
    resolver.report(error, id.position);

    Ok(None)
}

/// Formals and return types are scalars.
pub fn scalar_type(ty: &TypeNode) -> Result<Type, InternalError> {
    match ty {
        TypeNode::Int => Ok(Type::Int),
        TypeNode::Bool => Ok(Type::Bool),
        TypeNode::Void => Ok(Type::Void),
        TypeNode::Struct(id) => Err(InternalError::UnexpectedNode {
            expected: "int, bool or void",
            found: format!("struct {}", id.name),
        }),
    }
}

fn resolve_var_decl(
    resolver: &mut NameResolver,
    decl: &mut VarDecl,
    mut target: DeclTarget,
) -> Result<(), InternalError> {
    let name = decl.id.name.clone();
    let mut declared = None;

    if decl.ty.is_void() {
        let error = ErrorImpl::NonFunctionVoid { name: name.clone() };
        resolver.report(error, decl.id.position);
    } else {
        declared = resolve_type_node(resolver, &mut decl.ty)?;
    }

    let duplicate = match &target {
        DeclTarget::Field { table, .. } => table.lookup_local(&name).is_some(),
        DeclTarget::Global | DeclTarget::Local => resolver.table.lookup_local(&name).is_some(),
    };
    if duplicate {
        let error = ErrorImpl::MultiplyDeclared { name: name.clone() };
        resolver.report(error, decl.id.position);
    }

    let declared = match declared {
        Some(declared) if !duplicate => declared,
        _ => return Ok(()),
    };

    let size = declared.size();
    let storage = match &mut target {
        // Prefixed so no user name can spell a reserved label such as `__start`.
        DeclTarget::Global => Storage::Global {
            label: format!("_g_{}", name),
        },
        DeclTarget::Local => resolver.allocate_local(size)?,
        DeclTarget::Field { offset, .. } => {
            let storage = Storage::Field { offset: **offset };
            **offset += size;
            storage
        }
    };

    let symbol = match declared {
        DeclaredType::Scalar(ty) => Symbol::Variable(VariableSymbol {
            name: name.clone(),
            ty,
            storage,
        }),
        DeclaredType::Struct { name: struct_name, def, size } => {
            Symbol::StructInstance(StructInstanceSymbol {
                name: name.clone(),
                struct_name,
                struct_def: def,
                size,
                storage,
            })
        }
    };

    let id = resolver.alloc(symbol);
    match target {
        DeclTarget::Field { table, .. } => table.add_decl(&name, id)?,
        DeclTarget::Global | DeclTarget::Local => resolver.table.add_decl(&name, id)?,
    }
    decl.id.symbol = Some(id);

    Ok(())
}

fn resolve_formal(
    resolver: &mut NameResolver,
    formal: &mut FormalDecl,
    index: usize,
    count: usize,
) -> Result<(), InternalError> {
    let name = formal.id.name.clone();
    let ty = scalar_type(&formal.ty)?;
    let mut bad = false;

    if ty.is_void_type() {
        let error = ErrorImpl::NonFunctionVoid { name: name.clone() };
        resolver.report(error, formal.id.position);
        bad = true;
    }

    if resolver.table.lookup_local(&name).is_some() {
        let error = ErrorImpl::MultiplyDeclared { name: name.clone() };
        resolver.report(error, formal.id.position);
        bad = true;
    }

    if bad {
        return Ok(());
    }

    // The first argument is pushed first, so it ends up furthest from $fp.
    let offset = (WORD_SIZE * (count - index) as u32) as i32;
    let id = resolver.alloc(Symbol::Variable(VariableSymbol {
        name: name.clone(),
        ty,
        storage: Storage::Local { offset },
    }));
    resolver.table.add_decl(&name, id)?;
    formal.id.symbol = Some(id);

    Ok(())
}

fn resolve_fn_decl(resolver: &mut NameResolver, function: &mut FnDecl) -> Result<(), InternalError> {
    let name = function.id.name.clone();
    if name == "main" {
        resolver.context.main_declared = true;
    }

    let return_type = scalar_type(&function.return_type)?;
    let param_types = function
        .formals
        .iter()
        .map(|formal| scalar_type(&formal.ty))
        .collect::<Result<Vec<Type>, InternalError>>()?;

    let symbol = if resolver.table.lookup_local(&name).is_some() {
        let error = ErrorImpl::MultiplyDeclared { name: name.clone() };
        resolver.report(error, function.id.position);
        None
    } else {
        let label = if name == "main" {
            String::from("main")
        } else {
            format!("_f_{}", name)
        };
        let id = resolver.alloc(Symbol::Function(FunctionSymbol {
            name: name.clone(),
            label,
            return_type,
            params_size: WORD_SIZE * param_types.len() as u32,
            param_types,
            locals_size: 0,
        }));
        resolver.table.add_decl(&name, id)?;
        function.id.symbol = Some(id);
        Some(id)
    };

    resolver.table.add_scope();
    let enclosing = resolver.frame.replace(Frame::default());

    let count = function.formals.len();
    for (index, formal) in function.formals.iter_mut().enumerate() {
        resolve_formal(resolver, formal, index, count)?;
    }
    resolve_block_contents(resolver, &mut function.body)?;

    let frame = std::mem::replace(&mut resolver.frame, enclosing).unwrap_or_default();
    resolver.table.remove_scope()?;

    if let Some(id) = symbol {
        if let Symbol::Function(function) = resolver.context.symbols.get_mut(id)? {
            function.locals_size = frame.locals_size;
        }
    }

    Ok(())
}

fn resolve_struct_decl(
    resolver: &mut NameResolver,
    def: &mut StructDecl,
) -> Result<(), InternalError> {
    let name = def.id.name.clone();

    let duplicate = resolver.table.lookup_local(&name).is_some();
    if duplicate {
        let error = ErrorImpl::MultiplyDeclared { name: name.clone() };
        resolver.report(error, def.id.position);
    }

    let mut fields = SymbolTable::new();
    let mut size = 0;
    for field in def.fields.iter_mut() {
        let target = DeclTarget::Field {
            table: &mut fields,
            offset: &mut size,
        };
        resolve_var_decl(resolver, field, target)?;
    }

    if duplicate {
        return Ok(());
    }

    let id = resolver.alloc(Symbol::StructDef(StructDefSymbol {
        name: name.clone(),
        fields,
        size,
    }));
    resolver.table.add_decl(&name, id)?;
    def.id.symbol = Some(id);

    Ok(())
}

/// Declarations and statements of a block, in the current scope.
fn resolve_block_contents(resolver: &mut NameResolver, block: &mut Block) -> Result<(), InternalError> {
    for decl in block.decls.iter_mut() {
        resolve_var_decl(resolver, decl, DeclTarget::Local)?;
    }

    for stmt in block.stmts.iter_mut() {
        resolve_stmt(resolver, stmt)?;
    }

    Ok(())
}

/// A nested block gets its own scope.
fn resolve_block(resolver: &mut NameResolver, block: &mut Block) -> Result<(), InternalError> {
    resolver.table.add_scope();
    resolve_block_contents(resolver, block)?;
    resolver.table.remove_scope()?;

    Ok(())
}

pub fn resolve_stmt(resolver: &mut NameResolver, stmt: &mut Stmt) -> Result<(), InternalError> {
    match stmt {
        Stmt::Assign(assign) => {
            resolve_expr(resolver, &mut assign.target)?;
            resolve_expr(resolver, &mut assign.value)
        }
        Stmt::PostInc(target) | Stmt::PostDec(target) | Stmt::Read(target) => {
            resolve_expr(resolver, target)
        }
        Stmt::Write(value) => resolve_expr(resolver, value),
        Stmt::If(stmt) => {
            resolve_expr(resolver, &mut stmt.condition)?;
            resolve_block(resolver, &mut stmt.then_body)
        }
        Stmt::IfElse(stmt) => {
            resolve_expr(resolver, &mut stmt.condition)?;
            resolve_block(resolver, &mut stmt.then_body)?;
            resolve_block(resolver, &mut stmt.else_body)
        }
        Stmt::While(stmt) => {
            resolve_expr(resolver, &mut stmt.condition)?;
            resolve_block(resolver, &mut stmt.body)
        }
        Stmt::Repeat(stmt) => {
            resolve_expr(resolver, &mut stmt.count)?;
            resolve_block(resolver, &mut stmt.body)
        }
        Stmt::Call(call) => {
            resolve_id_use(resolver, &mut call.callee);
            for arg in call.args.iter_mut() {
                resolve_expr(resolver, arg)?;
            }
            Ok(())
        }
        Stmt::Return(ret) => match &mut ret.value {
            Some(value) => resolve_expr(resolver, value),
            None => Ok(()),
        },
    }
}

pub fn resolve_expr(resolver: &mut NameResolver, expr: &mut Expr) -> Result<(), InternalError> {
    match expr {
        Expr::IntLit { .. } | Expr::StrLit { .. } | Expr::True(_) | Expr::False(_) => Ok(()),
        Expr::Id(id) => {
            resolve_id_use(resolver, id);
            Ok(())
        }
        Expr::DotAccess(dot) => resolve_dot_access(resolver, dot).map(|_| ()),
        Expr::Assign(assign) => {
            resolve_expr(resolver, &mut assign.target)?;
            resolve_expr(resolver, &mut assign.value)
        }
        Expr::Call(call) => {
            resolve_id_use(resolver, &mut call.callee);
            for arg in call.args.iter_mut() {
                resolve_expr(resolver, arg)?;
            }
            Ok(())
        }
        Expr::Unary(unary) => resolve_expr(resolver, &mut unary.operand),
        Expr::Binary(binary) => {
            resolve_expr(resolver, &mut binary.lhs)?;
            resolve_expr(resolver, &mut binary.rhs)
        }
    }
}

fn resolve_id_use(resolver: &mut NameResolver, id: &mut IdNode) {
    match resolver.table.lookup_global(&id.name) {
        Some(symbol) => id.symbol = Some(symbol),
        None => {
            let error = ErrorImpl::UndeclaredIdentifier {
                name: id.name.clone(),
            };
            resolver.report(error, id.position);
        }
    }
}

/// Resolves `loc.field` by following the struct link of `loc`. The first
/// bad link of a chain is reported; everything after it stays silent.
fn resolve_dot_access(
    resolver: &mut NameResolver,
    dot: &mut DotAccessExpr,
) -> Result<DotOutcome, InternalError> {
    let base = match dot.loc.as_mut() {
        Expr::Id(id) => {
            resolve_id_use(resolver, id);

            match id.symbol {
                None => DotOutcome::Failed,
                Some(symbol) => match resolver.context.symbols.get(symbol)? {
                    Symbol::StructInstance(instance) => DotOutcome::Struct(instance.struct_def),
                    _ => {
                        resolver.report(ErrorImpl::DotAccessOfNonStruct, id.position);
                        DotOutcome::Failed
                    }
                },
            }
        }
        Expr::DotAccess(inner) => match resolve_dot_access(resolver, inner)? {
            DotOutcome::Scalar => {
                resolver.report(ErrorImpl::DotAccessOfNonStruct, inner.field.position);
                DotOutcome::Failed
            }
            outcome => outcome,
        },
        other => {
            return Err(InternalError::UnexpectedNode {
                expected: "identifier or dot-access",
                found: String::from(other.kind_name()),
            })
        }
    };

    let def = match base {
        DotOutcome::Struct(def) => def,
        _ => return Ok(DotOutcome::Failed),
    };

    let field = match resolver.context.symbols.fields_of(def)?.lookup_local(&dot.field.name) {
        Some(field) => field,
        None => {
            let error = ErrorImpl::InvalidFieldName {
                name: dot.field.name.clone(),
            };
            resolver.report(error, dot.field.position);
            return Ok(DotOutcome::Failed);
        }
    };

    dot.field.symbol = Some(field);

    Ok(match resolver.context.symbols.get(field)? {
        Symbol::StructInstance(instance) => DotOutcome::Struct(instance.struct_def),
        _ => DotOutcome::Scalar,
    })
}
