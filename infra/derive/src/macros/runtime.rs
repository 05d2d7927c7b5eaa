use proc_macro2::TokenStream;
use quote::quote;
use syn::{Error, Ident, ItemFn, ReturnType, Type};

/// Expands `#[rsvp_runtime::main]`.
pub fn expand_main(args: TokenStream, input: ItemFn) -> TokenStream {
    if input.sig.asyncness.is_none() {
        return Error::new_spanned(&input.sig.fn_token, "#[rsvp_runtime::main] requires an async fn")
            .to_compile_error();
    }
    if !returns_result(&input.sig.output) {
        return Error::new_spanned(
            &input.sig.output,
            "#[rsvp_runtime::main] requires a Result return type",
        )
        .to_compile_error();
    }

    let profile = match profile_constructor(args) {
        Ok(profile) => profile,
        Err(err) => return err.to_compile_error(),
    };

    let ItemFn { attrs, vis, sig, block } = input;
    let name = &sig.ident;
    let output = &sig.output;

    quote! {
        #(#attrs)*
        #vis fn #name() #output {
            let runtime = ::rsvp_runtime::build_runtime_with_config(&#profile)?;
            runtime.block_on(async move #block)
        }
    }
}

fn profile_constructor(args: TokenStream) -> syn::Result<TokenStream> {
    if args.is_empty() {
        return Ok(quote! { ::rsvp_runtime::RuntimeConfig::default() });
    }

    let profile: Ident = syn::parse2(args)?;
    match profile.to_string().as_str() {
        "default" => Ok(quote! { ::rsvp_runtime::RuntimeConfig::default() }),
        "high_performance" => Ok(quote! { ::rsvp_runtime::RuntimeConfig::high_performance() }),
        "memory_efficient" => Ok(quote! { ::rsvp_runtime::RuntimeConfig::memory_efficient() }),
        _ => Err(Error::new_spanned(
            profile,
            "unknown runtime profile; expected high_performance, memory_efficient or default",
        )),
    }
}

fn returns_result(output: &ReturnType) -> bool {
    match output {
        ReturnType::Type(_, ty) => match ty.as_ref() {
            Type::Path(path) => path.path.segments.last().is_some_and(|seg| seg.ident == "Result"),
            _ => false,
        },
        ReturnType::Default => false,
    }
}
