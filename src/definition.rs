//! Structural metadata for renderable units, and its inheritance helper.

use weft_core::token::Token;

/// How a component's styles are scoped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Encapsulation {
    /// Styles are rewritten so they apply only inside the component.
    #[default]
    Emulated,
    /// Styles apply globally.
    Global,
    /// The component renders into a natively isolated subtree.
    Isolated,
}

/// Node-checking relaxations a component opts into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Schema {
    /// Allow unknown custom elements.
    CustomElements,
    /// Suppress unknown-node errors entirely.
    NoErrors,
}

/// Fills in a unit's provider tokens.
pub type ProvidersResolver = fn(&mut Vec<Token>);

/// Which pass a template invocation performs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderPass {
    /// Build the view's nodes.
    Create,
    /// Refresh the view's bindings.
    Update,
}

/// A component's template function.
pub type TemplateFn = fn(RenderPass);

/// Metadata shared by every renderable unit.
#[derive(Clone, Debug)]
pub struct BehaviorDef {
    /// The unit's own type token.
    pub token: Token,
    /// Resolves the unit's providers.
    pub providers_resolver: Option<ProvidersResolver>,
}

impl BehaviorDef {
    /// A skeleton definition for `token` with no metadata filled in.
    #[must_use]
    pub const fn new(token: Token) -> Self {
        Self {
            token,
            providers_resolver: None,
        }
    }
}

/// Component metadata: behavior metadata plus everything needed to render.
#[derive(Clone, Debug)]
pub struct ComponentDef {
    /// The fields shared with plain behaviors.
    pub behavior: BehaviorDef,
    /// The template, including all of its semantics.
    pub template: Option<TemplateFn>,
    /// Nodes the template declares.
    pub node_count: usize,
    /// Bindings the template declares.
    pub binding_count: usize,
    /// Shared constant pool referenced by the template.
    pub consts: Vec<String>,
    /// Check only when explicitly marked dirty.
    pub check_on_push: bool,
    /// Selectors for projected content.
    pub content_selectors: Vec<String>,
    /// Style sheets, scoped per `encapsulation`.
    pub styles: Vec<String>,
    /// Style scoping mode.
    pub encapsulation: Encapsulation,
    /// Node-checking relaxations, if any.
    pub schemas: Option<Vec<Schema>>,
}

impl ComponentDef {
    /// A skeleton definition for `token` with no metadata filled in.
    #[must_use]
    pub fn new(token: Token) -> Self {
        Self {
            behavior: BehaviorDef::new(token),
            template: None,
            node_count: 0,
            binding_count: 0,
            consts: Vec::new(),
            check_on_push: false,
            content_selectors: Vec::new(),
            styles: Vec::new(),
            encapsulation: Encapsulation::default(),
            schemas: None,
        }
    }
}

/// A renderable unit's metadata, in one of its two kinds.
#[derive(Clone, Debug)]
pub enum Definition {
    /// A unit without a template of its own.
    Behavior(BehaviorDef),
    /// A unit that renders.
    Component(ComponentDef),
}

impl Definition {
    /// The component-kind discriminator.
    #[must_use]
    pub const fn is_component(&self) -> bool {
        matches!(self, Self::Component(_))
    }

    /// The unit's type token.
    #[must_use]
    pub const fn token(&self) -> &Token {
        match self {
            Self::Behavior(def) => &def.token,
            Self::Component(def) => &def.behavior.token,
        }
    }
}

/// Raw-metadata access for structural inheritance.
///
/// `behavior_def` and `component_def` must expose the raw metadata slots
/// exactly as declared — never a resolved or merged view. The copier's
/// semantics rely on reading what the ancestor itself wrote.
pub trait TypeHierarchy {
    /// The nearest ancestor of `ty`, if any.
    fn super_type(&self, ty: &Token) -> Option<Token>;
    /// The raw behavior-kind metadata declared on `ty`.
    fn behavior_def(&self, ty: &Token) -> Option<&BehaviorDef>;
    /// The raw component-kind metadata declared on `ty`.
    fn component_def(&self, ty: &Token) -> Option<&ComponentDef>;
}

// Fields that exist on either kind and are inherited whenever an ancestor
// definition exists.
fn copy_behavior_fields(child: &mut BehaviorDef, ancestor: &BehaviorDef) {
    // The child uses the providers of its parent.
    child.providers_resolver = ancestor.providers_resolver;
}

// Fields that exist only on component definitions.
fn copy_component_fields(child: &mut ComponentDef, ancestor: &ComponentDef) {
    // The child renders with the parent's template, including all template
    // semantics, and is checked the same way.
    child.template = ancestor.template;
    child.node_count = ancestor.node_count;
    child.binding_count = ancestor.binding_count;
    child.consts = ancestor.consts.clone();
    child.check_on_push = ancestor.check_on_push;
    child.content_selectors = ancestor.content_selectors.clone();
    child.styles = ancestor.styles.clone();
    child.encapsulation = ancestor.encapsulation;
    child.schemas = ancestor.schemas.clone();
}

/// Copies inherited metadata onto a skeleton child definition.
///
/// Resolves the child's nearest ancestor and reads the ancestor's raw
/// metadata slot matching the child's own kind. The common field set is
/// copied unconditionally; the component-only set additionally when the
/// ancestor metadata is component-kind. The copy is purely structural — no
/// compatibility validation — and does nothing when there is no ancestor or
/// the ancestor declares no metadata of the needed kind.
pub fn copy_inherited_fields<H>(hierarchy: &H, child: &mut Definition)
where
    H: TypeHierarchy + ?Sized,
{
    let Some(ancestor) = hierarchy.super_type(child.token()) else {
        return;
    };
    match child {
        Definition::Component(def) => {
            let Some(ancestor_def) = hierarchy.component_def(&ancestor) else {
                return;
            };
            copy_behavior_fields(&mut def.behavior, &ancestor_def.behavior);
            copy_component_fields(def, ancestor_def);
        }
        Definition::Behavior(def) => {
            let Some(ancestor_def) = hierarchy.behavior_def(&ancestor) else {
                return;
            };
            copy_behavior_fields(def, ancestor_def);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use weft_core::token::{Token, TokenKey};

    use super::{
        BehaviorDef, ComponentDef, Definition, Encapsulation, RenderPass, Schema, TypeHierarchy,
        copy_inherited_fields,
    };

    #[derive(Default)]
    struct Registry {
        parents: HashMap<TokenKey, Token>,
        behaviors: HashMap<TokenKey, BehaviorDef>,
        components: HashMap<TokenKey, ComponentDef>,
    }

    impl TypeHierarchy for Registry {
        fn super_type(&self, ty: &Token) -> Option<Token> {
            self.parents.get(&ty.key()).cloned()
        }

        fn behavior_def(&self, ty: &Token) -> Option<&BehaviorDef> {
            self.behaviors.get(&ty.key())
        }

        fn component_def(&self, ty: &Token) -> Option<&ComponentDef> {
            self.components.get(&ty.key())
        }
    }

    fn push_providers(_providers: &mut Vec<Token>) {}
    fn render(_pass: RenderPass) {}

    struct Base;
    struct Derived;

    fn ancestor_component() -> ComponentDef {
        let mut def = ComponentDef::new(Token::of::<Base>());
        def.behavior.providers_resolver = Some(push_providers);
        def.template = Some(render);
        def.node_count = 4;
        def.binding_count = 2;
        def.consts = vec!["title".into()];
        def.check_on_push = true;
        def.content_selectors = vec!["*".into()];
        def.styles = vec![":host { display: block }".into()];
        def.encapsulation = Encapsulation::Isolated;
        def.schemas = Some(vec![Schema::CustomElements]);
        def
    }

    #[test]
    fn test_component_child_of_component_ancestor_copies_everything() {
        let mut registry = Registry::default();
        registry
            .parents
            .insert(Token::of::<Derived>().key(), Token::of::<Base>());
        registry
            .components
            .insert(Token::of::<Base>().key(), ancestor_component());

        let mut child = Definition::Component(ComponentDef::new(Token::of::<Derived>()));
        copy_inherited_fields(&registry, &mut child);

        let Definition::Component(def) = child else {
            panic!("child should stay component-kind");
        };
        assert!(def.behavior.providers_resolver.is_some());
        assert!(def.template.is_some());
        assert_eq!(def.node_count, 4);
        assert_eq!(def.binding_count, 2);
        assert_eq!(def.consts, vec!["title".to_string()]);
        assert!(def.check_on_push);
        assert_eq!(def.encapsulation, Encapsulation::Isolated);
        assert_eq!(def.schemas, Some(vec![Schema::CustomElements]));
    }

    #[test]
    fn test_behavior_child_copies_only_common_fields() {
        let mut registry = Registry::default();
        registry
            .parents
            .insert(Token::of::<Derived>().key(), Token::of::<Base>());
        let mut base = BehaviorDef::new(Token::of::<Base>());
        base.providers_resolver = Some(push_providers);
        registry.behaviors.insert(Token::of::<Base>().key(), base);

        let mut child = Definition::Behavior(BehaviorDef::new(Token::of::<Derived>()));
        copy_inherited_fields(&registry, &mut child);

        let Definition::Behavior(def) = child else {
            panic!("child should stay behavior-kind");
        };
        assert!(def.providers_resolver.is_some());
    }

    #[test]
    fn test_missing_ancestor_or_metadata_is_a_no_op() {
        let registry = Registry::default();
        let mut child = Definition::Component(ComponentDef::new(Token::of::<Derived>()));
        copy_inherited_fields(&registry, &mut child);

        let Definition::Component(def) = child else {
            panic!("child should stay component-kind");
        };
        assert!(def.template.is_none());
        assert_eq!(def.node_count, 0);
    }

    #[test]
    fn test_raw_slot_selection_follows_the_child_kind() {
        // The ancestor declares only behavior-kind metadata; a component
        // child reads the component slot and therefore inherits nothing.
        let mut registry = Registry::default();
        registry
            .parents
            .insert(Token::of::<Derived>().key(), Token::of::<Base>());
        let mut base = BehaviorDef::new(Token::of::<Base>());
        base.providers_resolver = Some(push_providers);
        registry.behaviors.insert(Token::of::<Base>().key(), base);

        let mut child = Definition::Component(ComponentDef::new(Token::of::<Derived>()));
        copy_inherited_fields(&registry, &mut child);

        let Definition::Component(def) = child else {
            panic!("child should stay component-kind");
        };
        assert!(def.behavior.providers_resolver.is_none());
    }
}
