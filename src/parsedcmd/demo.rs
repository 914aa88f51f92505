use anyhow::anyhow;
use parsedcmd::coerce::Coercion;
use parsedcmd::config::ShellConfig;
use parsedcmd::error::ResolutionError;
use parsedcmd::function::{Function, Parameter};
use parsedcmd::shell::{Ctx, Shell, ShellBuilder};
use parsedcmd::value::Value;
use std::io::Write;

pub fn build<W: Write>(config: ShellConfig, out: W) -> Result<Shell<W>, ResolutionError> {
    let say = say();
    let say_handler = say.get_handler();

    let mut builder = ShellBuilder::new(config)
        .command("print", print())
        .command("multiply", multiply())
        .command("double", double())
        .command("say", say)
        .command("shell", shell())
        .command("quit", quit());

    if let Some(inner) = say_handler {
        builder = builder.command("shout", shout(inner));
    }

    builder.build(out)
}

fn print() -> Function {
    Function::new("do_print")
        .param(Parameter::receiver("self"))
        .param(Parameter::positional("line").default("abc"))
        .param(
            Parameter::keyword_only("flag")
                .default(true)
                .annotated(Coercion::boolean()),
        )
        .param(
            Parameter::keyword_only("repeat")
                .default(1)
                .annotated(Coercion::integer()),
        )
        .doc(
            "Print a given string (defaults to \"abc\").\n\
             Print nothing if -flag is set to false.\n\
             Print multiple copies if -repeat N option is given.",
        )
        .body(|ctx, args| {
            if args.bool("flag").unwrap_or(true) {
                let line = args.str("line").unwrap_or_default();
                for _ in 0..args.int("repeat").unwrap_or(1) {
                    writeln!(ctx, "{}", line)?;
                }
            }
            Ok(())
        })
}

fn multiply() -> Function {
    Function::new("do_multiply")
        .param(Parameter::receiver("self"))
        .param(Parameter::positional("mul").annotated(Coercion::integer()))
        .param(Parameter::variadic("nums").annotated(Coercion::integer()))
        .doc("Print `mul` times the numbers given.")
        .body(|ctx, args| {
            let mul = args.int("mul").unwrap_or_default();
            for num in args.rest().iter().filter_map(Value::as_int) {
                let product = mul.checked_mul(num).ok_or_else(|| anyhow!("overflow"))?;
                writeln!(ctx, "{}", product)?;
            }
            Ok(())
        })
}

// Same shape as `multiply`, with the coercion declared out of band.
fn double() -> Function {
    Function::new("do_double")
        .param(Parameter::receiver("self"))
        .param(Parameter::variadic("nums"))
        .annotate("nums", Coercion::integer())
        .doc("Print twice the numbers given.")
        .body(|ctx, args| {
            for num in args.rest().iter().filter_map(Value::as_int) {
                let doubled = num.checked_mul(2).ok_or_else(|| anyhow!("overflow"))?;
                writeln!(ctx, "{}", doubled)?;
            }
            Ok(())
        })
}

fn say() -> Function {
    Function::new("do_say")
        .param(Parameter::receiver("self"))
        .param(Parameter::positional("sep").default(" "))
        .param(Parameter::variadic("words"))
        .keyword_only("sep")
        .doc("Print the words given, joined by -sep.")
        .body(|ctx, args| {
            let sep = args.str("sep").unwrap_or(" ");
            let words: Vec<String> = args.rest().iter().map(Value::to_string).collect();
            writeln!(ctx, "{}", words.join(sep))?;
            Ok(())
        })
}

// A wrapper: takes anything, forwards to `do_say` and upper-cases what it prints.
// Lines are parsed with `do_say`'s parameters.
fn shout(inner: parsedcmd::function::Handler) -> Function {
    Function::new("do_shout")
        .param(Parameter::variadic("args"))
        .wraps("do_say")
        .body(move |ctx, args| {
            let mut buf = Vec::new();
            inner(&mut Ctx::new(&mut buf), args)?;
            ctx.write_all(String::from_utf8_lossy(&buf).to_uppercase().as_bytes())?;
            Ok(())
        })
}

fn shell() -> Function {
    Function::new("do_shell")
        .param(Parameter::receiver("self"))
        .param(Parameter::positional("line"))
        .raw()
        .doc("Echo the given line, unparsed.")
        .body(|ctx, args| {
            writeln!(ctx, "{}", args.line().unwrap_or_default())?;
            Ok(())
        })
}

fn quit() -> Function {
    Function::new("do_quit")
        .doc("Exit the shell.")
        .body(|ctx, _| {
            ctx.stop();
            Ok(())
        })
}
